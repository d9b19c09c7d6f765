//! Tasks Module
//!
//! # Architecture
//!
//! - **`ordering`** - pure move/removal planning over dense positions
//! - **`db`** - task persistence; executes plans inside transactions
//! - **`search`** - FTS5 title search
//! - **`handlers`** - HTTP handlers under `/api/tasks`
//!
//! # Position invariant
//!
//! Within one list, task positions sorted ascending are exactly `0..n`.
//! Creation appends, moves shift a range then place, deletion shifts the
//! tail down. `ordering` is the only code that decides positions.

pub mod db;
pub mod handlers;
pub mod ordering;
pub mod search;
