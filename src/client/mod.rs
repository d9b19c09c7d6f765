//! Board Client
//!
//! Everything a board view needs apart from rendering: the in-memory board,
//! optimistic drag-and-drop, merging of server-confirmed tasks and broadcast
//! events, and the REST and socket transports.
//!
//! # Architecture
//!
//! - **`board_state`** - lists and tasks of one board, drag-end and event merge
//! - **`optimistic`** - moves applied locally and awaiting the server
//! - **`session`** - state + pending moves + API client for one open board
//! - **`api`** - `reqwest` client for the REST API
//! - **`socket`** - `tokio-tungstenite` client for the board socket
//! - **`config`** / **`error`** - client configuration and errors
//!
//! ```text
//! client/
//! ├── mod.rs          - Module exports and documentation
//! ├── board_state.rs  - Board state and reconciliation
//! ├── optimistic.rs   - Pending optimistic moves
//! ├── session.rs      - Board session
//! ├── api.rs          - REST client
//! ├── socket.rs       - Board socket client
//! ├── config.rs       - Client configuration
//! └── error.rs        - Client errors
//! ```

pub mod api;
pub mod board_state;
pub mod config;
pub mod error;
pub mod optimistic;
pub mod session;
pub mod socket;

pub use api::ApiClient;
pub use board_state::{BoardState, DropTarget, MoveRequest};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use optimistic::{OptimisticMoves, PendingMove};
pub use session::{BoardSession, MoveOutcome};
pub use socket::BoardSocket;
