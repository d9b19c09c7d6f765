/**
 * Application State Management
 *
 * This module defines the application state every handler extracts with
 * `State<AppState>`.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The SQLite connection pool (optional, absent when the database failed to open)
 * - Per-board broadcast channels for the board socket
 * - The event publisher handed to handlers
 * - Token settings and the resolved server configuration
 *
 * # Thread Safety
 *
 * Every field is cheap to clone and safe to share: the pool and the channel
 * map are reference counted internally.
 */

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::backend::auth::sessions::TokenSettings;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::realtime::publisher::{BoardChannels, BoardEventPublisher};
use crate::backend::server::config::ServerConfig;

/// Application state shared by every handler
///
/// # Fields
///
/// * `db_pool` - Optional SQLite connection pool
/// * `board_channels` - Per-board broadcast channels (subscribed by the socket)
/// * `publisher` - Where handlers send board events
/// * `tokens` - Session token settings
/// * `config` - Resolved server configuration
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    ///
    /// This is `None` if the database could not be opened. Handlers go
    /// through `AppState::pool`, which reports 503 in that case.
    pub db_pool: Option<SqlitePool>,

    /// Per-board broadcast channels
    pub board_channels: BoardChannels,

    /// Board event publisher
    ///
    /// Normally the same channels as `board_channels`, held as a trait object
    /// so handlers only see `publish`.
    pub publisher: Arc<dyn BoardEventPublisher>,

    /// Session token settings
    pub tokens: TokenSettings,

    /// Resolved server configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build state whose publisher fans out over its own board channels
    pub fn new(db_pool: Option<SqlitePool>, config: ServerConfig) -> Self {
        let board_channels = BoardChannels::new(config.event_channel_capacity);
        let tokens = TokenSettings::new(config.jwt_secret.clone(), config.token_ttl_days);

        Self {
            db_pool,
            publisher: Arc::new(board_channels.clone()),
            board_channels,
            tokens,
            config: Arc::new(config),
        }
    }

    /// Replace the publisher
    pub fn with_publisher(mut self, publisher: Arc<dyn BoardEventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// The database pool, or 503 if the database is not configured
    pub fn pool(&self) -> BackendResult<&SqlitePool> {
        self.db_pool.as_ref().ok_or_else(|| {
            tracing::error!("Database not configured");
            BackendError::ServiceUnavailable
        })
    }
}
