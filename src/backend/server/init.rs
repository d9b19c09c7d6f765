/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including database loading, state creation and route configuration.
 *
 * # Initialization Process
 *
 * 1. Open the SQLite pool and apply migrations (optional; 503s without it)
 * 2. Create the application state and per-board channels
 * 3. Start the periodic channel cleanup task
 * 4. Create and configure the router
 */

use std::time::Duration;

use axum::Router;
use tokio::task::JoinHandle;

use crate::backend::realtime::BoardChannels;
use crate::backend::routes::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// How often board channels without receivers are pruned
pub const CHANNEL_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Create and configure the Axum application
///
/// The function is designed to be resilient: a database that cannot be
/// opened is logged and the server starts without it.
pub async fn create_app(config: ServerConfig) -> Router<()> {
    tracing::info!(?config, "Initializing taskboard server");

    let db_pool = load_database(&config).await;
    let app_state = AppState::new(db_pool, config);

    spawn_channel_cleanup(app_state.board_channels.clone());
    tracing::info!("Router configured with periodic cleanup task");

    create_router(app_state)
}

/// Periodically drop board channels nobody listens to
pub fn spawn_channel_cleanup(channels: BoardChannels) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CHANNEL_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = channels.cleanup_inactive_channels();
            tracing::debug!(removed, "Cleaned up inactive board channels");
        }
    })
}
