//! Activity Feed
//!
//! An append-only record of notable board actions, read back newest first.

pub mod db;
pub mod handlers;

pub use db::{actions, log_activity, NewActivity};
