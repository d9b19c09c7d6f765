//! Real-time Update Module
//!
//! Pushes task changes to everyone viewing a board.
//!
//! # Architecture
//!
//! - **`publisher`** - per-board broadcast channels behind the
//!   `BoardEventPublisher` trait
//! - **`socket`** - the `/ws` WebSocket endpoint clients join boards through
//!
//! ```text
//! realtime/
//! ├── mod.rs        - Module exports and documentation
//! ├── publisher.rs  - Board channels and the publisher trait
//! └── socket.rs     - WebSocket upgrade and per-connection session
//! ```
//!
//! # Delivery
//!
//! Best-effort and ordered per board channel. Each socket has a bounded
//! outgoing queue. Events that do not fit, and events its broadcast receiver
//! skipped, are dropped and logged as lag; clients recover by reloading the
//! board.

/// Board channels and the publisher trait
pub mod publisher;

/// WebSocket endpoint
pub mod socket;

pub use publisher::{BoardChannels, BoardEventPublisher};
pub use socket::board_socket;
