//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and the board client. These types are what travels over the
//! REST API and the board socket.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code. All types are designed for serialization
//! and transmission as JSON.

/// Board, list, task, user and activity representations
pub mod models;

/// Board socket frames
pub mod event;

/// REST request and response bodies
pub mod api;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use models::{ActivityEntry, Board, EntityType, SearchHit, Task, TaskList, UserSummary};
pub use event::{BoardEvent, ServerFrame, SocketCommand, SocketReply};
pub use api::UpdateTaskRequest;
pub use error::SharedError;
