/**
 * Board Event Fan-out
 *
 * Each board has its own `tokio::sync::broadcast` channel, created the first
 * time someone subscribes and pruned once every receiver is gone. Handlers
 * never touch the channels directly; they hold an `Arc<dyn BoardEventPublisher>`
 * taken from `AppState`.
 *
 * # Delivery
 *
 * Delivery is best-effort. Publishing to a board nobody has joined is a no-op,
 * and a receiver that falls more than the channel capacity behind skips the
 * oldest events (it is told how many via `RecvError::Lagged`).
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::BoardEvent;

/// Sink for board events
pub trait BoardEventPublisher: Send + Sync {
    /// Deliver `event` to every participant of `event.board_id()`
    ///
    /// Returns the number of receivers the event was handed to.
    fn publish(&self, event: BoardEvent) -> usize;
}

/// Per-board broadcast channels
#[derive(Clone)]
pub struct BoardChannels {
    channels: Arc<Mutex<HashMap<Uuid, broadcast::Sender<BoardEvent>>>>,
    capacity: usize,
}

impl BoardChannels {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, broadcast::Sender<BoardEvent>>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get or create the channel for a board and subscribe to it
    pub fn subscribe(&self, board_id: Uuid) -> broadcast::Receiver<BoardEvent> {
        let capacity = self.capacity;
        self.lock()
            .entry(board_id)
            .or_insert_with(|| broadcast::channel(capacity).0)
            .subscribe()
    }

    /// Drop channels that have no receivers left
    ///
    /// Returns the number of channels removed.
    pub fn cleanup_inactive_channels(&self) -> usize {
        let mut channels = self.lock();
        let before = channels.len();
        channels.retain(|_, sender| sender.receiver_count() > 0);
        before - channels.len()
    }

    /// Get subscriber count for a board
    pub fn subscriber_count(&self, board_id: Uuid) -> usize {
        self.lock()
            .get(&board_id)
            .map_or(0, |sender| sender.receiver_count())
    }

    pub fn channel_count(&self) -> usize {
        self.lock().len()
    }
}

impl BoardEventPublisher for BoardChannels {
    fn publish(&self, event: BoardEvent) -> usize {
        let board_id = event.board_id();
        let name = event.name();

        let Some(sender) = self.lock().get(&board_id).cloned() else {
            tracing::debug!(%board_id, event = name, "No subscribers for board");
            return 0;
        };

        match sender.send(event) {
            Ok(count) => {
                tracing::debug!(%board_id, event = name, subscribers = count, "Board event published");
                count
            }
            Err(_) => {
                tracing::debug!(%board_id, event = name, "No subscribers for board");
                0
            }
        }
    }
}
