/**
 * Board Session
 *
 * Ties a `BoardState`, the pending optimistic moves and the API client
 * together for one open board.
 *
 * # Flow
 *
 * 1. `drag_end` applies the drop to local state and returns immediately; the
 *    `PUT` runs on a spawned task.
 * 2. The task reports a `MoveOutcome` over a channel. `poll_outcomes` (or
 *    `next_outcome`) merges a confirmed task into state, or turns a failure
 *    into a notice for the user. Failed moves are not retried.
 * 3. `apply_event` merges broadcast events whenever they arrive, before or
 *    after the matching outcome.
 * 4. `reload` replaces everything with a fresh snapshot, e.g. after the
 *    socket reported missed events or a move failed.
 */

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::client::api::ApiClient;
use crate::client::board_state::{BoardState, DropTarget, MoveRequest};
use crate::client::error::{ClientError, ClientResult};
use crate::client::optimistic::OptimisticMoves;
use crate::shared::{BoardEvent, Task};

/// Result of a spawned move request
#[derive(Debug)]
pub enum MoveOutcome {
    Confirmed(Task),
    Failed { task_id: Uuid, error: ClientError },
}

pub struct BoardSession {
    api: ApiClient,
    state: BoardState,
    pending: OptimisticMoves,
    outcomes_tx: mpsc::UnboundedSender<MoveOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<MoveOutcome>,
    notice: Option<String>,
}

impl BoardSession {
    pub fn new(api: ApiClient, state: BoardState) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            api,
            state,
            pending: OptimisticMoves::new(),
            outcomes_tx,
            outcomes_rx,
            notice: None,
        }
    }

    /// Fetch a board's lists and tasks and open a session on them
    pub async fn load(api: ApiClient, board_id: Uuid) -> ClientResult<Self> {
        let state = fetch_snapshot(&api, board_id).await?;
        Ok(Self::new(api, state))
    }

    /// Refetch the board and drop every pending move
    ///
    /// Outcomes of requests still in flight merge as usual when they arrive.
    pub async fn reload(&mut self) -> ClientResult<()> {
        self.state = fetch_snapshot(&self.api, self.state.board_id()).await?;
        self.pending.clear();
        Ok(())
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn pending(&self) -> &OptimisticMoves {
        &self.pending
    }

    /// Last failure worth showing to the user
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Apply a drop locally and send the move in the background
    ///
    /// Returns the spawned request, or `None` when the drop changed nothing.
    pub fn drag_end(&mut self, active: Uuid, target: DropTarget) -> Option<JoinHandle<()>> {
        let request = self.state.apply_drag_end(active, target)?;
        self.pending.begin(request);
        Some(self.spawn_move(request))
    }

    /// Merge a broadcast event for this board
    pub fn apply_event(&mut self, event: &BoardEvent) {
        if self.state.apply_event(event) {
            self.pending.confirm(event.task_id());
        }
    }

    /// Merge every outcome that has already arrived
    pub fn poll_outcomes(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            self.handle_outcome(outcome);
            handled += 1;
        }
        handled
    }

    /// Wait for the next move outcome and merge it
    pub async fn next_outcome(&mut self) {
        if let Some(outcome) = self.outcomes_rx.recv().await {
            self.handle_outcome(outcome);
        }
    }

    fn spawn_move(&self, request: MoveRequest) -> JoinHandle<()> {
        let api = self.api.clone();
        let outcomes = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let outcome = match api.move_task(&request).await {
                Ok(task) => MoveOutcome::Confirmed(task),
                Err(error) => MoveOutcome::Failed {
                    task_id: request.task_id,
                    error,
                },
            };
            // The session may have been dropped meanwhile.
            let _ = outcomes.send(outcome);
        })
    }

    fn handle_outcome(&mut self, outcome: MoveOutcome) {
        match outcome {
            MoveOutcome::Confirmed(task) => {
                self.pending.confirm(task.id);
                if task.board_id == self.state.board_id() {
                    self.state.apply_task(task);
                }
            }
            MoveOutcome::Failed { task_id, error } => {
                self.pending.fail(task_id);
                self.notice = Some(format!("Could not move task: {error}"));
            }
        }
    }
}

async fn fetch_snapshot(api: &ApiClient, board_id: Uuid) -> ClientResult<BoardState> {
    let lists = api.board_lists(board_id).await?;
    let mut tasks = Vec::new();
    for list in &lists {
        tasks.extend(api.list_tasks(list.id).await?);
    }
    tracing::debug!(%board_id, lists = lists.len(), tasks = tasks.len(), "Board loaded");

    Ok(BoardState::from_snapshot(board_id, lists, tasks))
}
