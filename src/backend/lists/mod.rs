//! Lists Module
//!
//! Named columns of a board. List ordering is append-only: new lists go after
//! the last one.

pub mod db;
pub mod handlers;
