//! Taskboard - Main Library
//!
//! A collaborative kanban board: boards hold ordered lists, lists hold ordered
//! tasks, and every change to a task is pushed to everyone viewing the board.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between server and client
//!   - Boards, lists, tasks, activity entries
//!   - Board socket frames and REST bodies
//!   - Error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server and board socket
//!   - Dense task ordering inside SQLite transactions
//!   - JWT authentication, activity feed, full-text search
//!
//! - **`client`** - Board client library
//!   - In-memory board state with optimistic drag-and-drop
//!   - Merge of server-confirmed tasks and broadcast events
//!   - REST and socket clients
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend modules and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use taskboard::backend::server::{config::ServerConfig, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::load()?).await;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Ordering
//!
//! Within a list, task positions sorted ascending are always `0..n`. The
//! server keeps that invariant transactionally; the client mirrors the same
//! arithmetic so an optimistic drop lands where the server will put it.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Board client: state reconciliation and transport
pub mod client;
