//! Boards Module
//!
//! Boards are the unit of collaboration: every list, task and activity entry
//! belongs to one, and every access check is a membership check on one.
//!
//! - **`db`** - board and membership persistence
//! - **`access`** - `require_member` / `require_owner`
//! - **`handlers`** - HTTP handlers under `/api/boards`

pub mod access;
pub mod db;
pub mod handlers;

pub use access::{require_member, require_owner};
