//! # Optimistic Moves
//!
//! Moves applied locally whose `PUT` has not been answered yet. A move leaves
//! the set when the server confirms it, when a broadcast for the same task
//! arrives, or when the request fails. Failed moves are reported, never
//! retried.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::client::board_state::MoveRequest;

/// A move awaiting its server response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub request: MoveRequest,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct OptimisticMoves {
    pending: HashMap<Uuid, PendingMove>,
}

impl OptimisticMoves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a move just applied locally
    ///
    /// A newer drag of the same task replaces the older entry.
    pub fn begin(&mut self, request: MoveRequest) {
        self.pending.insert(
            request.task_id,
            PendingMove {
                request,
                applied_at: Utc::now(),
            },
        );
    }

    /// The server confirmed the task (response or broadcast)
    pub fn confirm(&mut self, task_id: Uuid) -> Option<PendingMove> {
        self.pending.remove(&task_id)
    }

    /// The request for the task failed
    pub fn fail(&mut self, task_id: Uuid) -> Option<PendingMove> {
        let failed = self.pending.remove(&task_id);
        if let Some(failed) = &failed {
            tracing::warn!(
                %task_id,
                list_id = %failed.request.list_id,
                position = failed.request.position,
                pending_ms = (Utc::now() - failed.applied_at).num_milliseconds(),
                "Optimistic move failed"
            );
        }
        failed
    }

    pub fn is_pending(&self, task_id: Uuid) -> bool {
        self.pending.contains_key(&task_id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Forget everything, e.g. after reloading the board
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
