//! Backend Module
//!
//! This module contains all server-side code for the taskboard application:
//! an Axum HTTP server with a per-board WebSocket channel.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Registration, login, JWT tokens, user lookups
//! - **`middleware`** - Bearer token authentication
//! - **`boards`** - Boards, membership and access checks
//! - **`lists`** - Lists within a board
//! - **`tasks`** - Tasks, the ordering engine and full-text search
//! - **`activity`** - Per-board activity feed
//! - **`realtime`** - Per-board event channels and the board socket
//! - **`error`** - Backend-specific error types
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── boards/         - Boards and membership
//! ├── lists/          - Lists
//! ├── tasks/          - Tasks, ordering, search
//! ├── activity/       - Activity feed
//! ├── realtime/       - Event fan-out
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! Handlers share an `AppState` holding the SQLite pool, the per-board
//! broadcast channels, the event publisher and the resolved configuration.
//! Position bookkeeping never happens in memory: every multi-step mutation
//! runs inside one SQLite transaction.
//!
//! # Error Handling
//!
//! Handlers return `BackendResult<T>`; `BackendError` renders as
//! `{"error", "category", "status"}` JSON with the matching status code.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Boards and membership
pub mod boards;

/// Lists within a board
pub mod lists;

/// Tasks, ordering and search
pub mod tasks;

/// Activity feed
pub mod activity;

/// Real-time update system
pub mod realtime;

/// Re-export commonly used types
pub use error::{BackendError, BackendResult};
pub use realtime::{BoardChannels, BoardEventPublisher};
pub use server::{create_app, AppState};
