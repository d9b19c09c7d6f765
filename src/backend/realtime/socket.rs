/**
 * Board Socket Handler
 *
 * `GET /ws?token=<jwt>` upgrades to a WebSocket. The token is verified before
 * the upgrade; browsers cannot set an Authorization header on a WebSocket
 * handshake, so it travels as a query parameter.
 *
 * # Protocol
 *
 * Client text frames are `SocketCommand`s (`joinBoard` / `leaveBoard`).
 * Joining checks board membership and answers `joined` or `error`; leaving
 * answers `left`. While joined, every `BoardEvent` published for the board is
 * forwarded as a text frame. A connection may join several boards.
 *
 * # Tasks
 *
 * Each connection runs two tasks: a writer draining an mpsc queue into the
 * socket, and a session loop that reads commands and forwards board events
 * into that queue. When either ends the other is aborted, which drops the
 * broadcast receivers.
 *
 * # Slow clients
 *
 * The outgoing queue holds at most `event_channel_capacity` frames. An event
 * that finds it full is dropped, and so is anything the broadcast receiver
 * skipped; both are counted and logged as lag. A client that missed events
 * reloads the board.
 */

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{stream::SplitStream, SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::StreamMap;
use uuid::Uuid;

use crate::backend::boards::require_member;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{authenticate_token, AuthenticatedUser};
use crate::backend::server::state::AppState;
use crate::shared::{BoardEvent, SocketCommand, SocketReply};

/// Query string of the socket upgrade
#[derive(Debug, Default, Deserialize)]
pub struct SocketParams {
    pub token: Option<String>,
}

/// Upgrade handler for `GET /ws`
pub async fn board_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<SocketParams>,
) -> BackendResult<Response> {
    let token = params
        .token
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| BackendError::unauthenticated("Missing token"))?;
    let user = authenticate_token(&state, token.trim()).await?;

    tracing::info!(user_id = %user.user_id, "Board socket connected");
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user)))
}

async fn handle_socket(socket: WebSocket, state: AppState, user: AuthenticatedUser) {
    let (mut ws_sender, ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Message>(state.config.event_channel_capacity.max(1));
    let user_id = user.user_id;

    let mut write_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(msg).await.is_err() {
                tracing::debug!(%user_id, "WebSocket write failed");
                break;
            }
        }
    });

    let mut session_task = tokio::spawn(async move {
        SocketSession::new(state, user, tx).run(ws_receiver).await;
    });

    tokio::select! {
        _ = &mut session_task => {
            write_task.abort();
        }
        _ = &mut write_task => {
            session_task.abort();
        }
    }

    tracing::info!(%user_id, "Board socket disconnected");
}

/// Per-connection state: joined boards and the outgoing queue
struct SocketSession {
    state: AppState,
    user: AuthenticatedUser,
    out: mpsc::Sender<Message>,
    boards: StreamMap<Uuid, BroadcastStream<BoardEvent>>,
    /// Events this client never received
    dropped: u64,
}

impl SocketSession {
    fn new(state: AppState, user: AuthenticatedUser, out: mpsc::Sender<Message>) -> Self {
        Self {
            state,
            user,
            out,
            boards: StreamMap::new(),
            dropped: 0,
        }
    }

    async fn run(mut self, mut receiver: SplitStream<WebSocket>) {
        loop {
            tokio::select! {
                incoming = receiver.next() => match incoming {
                    Some(Ok(Message::Text(text))) => self.handle_command(text.as_str()).await,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(user_id = %self.user.user_id, "WebSocket read failed: {}", e);
                        break;
                    }
                },
                Some((board_id, item)) = self.boards.next(), if !self.boards.is_empty() => {
                    self.forward(board_id, item);
                }
            }

            if self.out.is_closed() {
                break;
            }
        }
    }

    async fn handle_command(&mut self, text: &str) {
        let command = match serde_json::from_str::<SocketCommand>(text) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!(user_id = %self.user.user_id, "Invalid socket command: {}", e);
                self.reply(SocketReply::Error {
                    message: "Invalid command".to_string(),
                });
                return;
            }
        };

        match command {
            SocketCommand::JoinBoard { board_id } => match self.check_membership(board_id).await {
                Ok(()) => {
                    if !self.boards.contains_key(&board_id) {
                        let receiver = self.state.board_channels.subscribe(board_id);
                        self.boards.insert(board_id, BroadcastStream::new(receiver));
                    }
                    tracing::debug!(user_id = %self.user.user_id, %board_id, "Joined board");
                    self.reply(SocketReply::Joined { board_id });
                }
                Err(e) => self.reply(SocketReply::Error { message: e.message() }),
            },
            SocketCommand::LeaveBoard { board_id } => {
                self.boards.remove(&board_id);
                tracing::debug!(user_id = %self.user.user_id, %board_id, "Left board");
                self.reply(SocketReply::Left { board_id });
            }
        }
    }

    async fn check_membership(&self, board_id: Uuid) -> BackendResult<()> {
        let pool = self.state.pool()?;
        require_member(pool, board_id, self.user.user_id).await?;
        Ok(())
    }

    fn forward(&mut self, board_id: Uuid, item: Result<BoardEvent, BroadcastStreamRecvError>) {
        let skipped = match item {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => match self.send(json) {
                    Err(TrySendError::Full(_)) => 1,
                    _ => return,
                },
                Err(e) => {
                    tracing::error!(%board_id, "Failed to serialize board event: {:?}", e);
                    return;
                }
            },
            Err(BroadcastStreamRecvError::Lagged(skipped)) => skipped,
        };

        self.dropped += skipped;
        tracing::warn!(
            user_id = %self.user.user_id,
            %board_id,
            skipped,
            dropped = self.dropped,
            "Board socket lagged"
        );
    }

    fn reply(&self, reply: SocketReply) {
        match serde_json::to_string(&reply) {
            Ok(json) => {
                if let Err(TrySendError::Full(_)) = self.send(json) {
                    tracing::warn!(user_id = %self.user.user_id, ?reply, "Socket queue full, reply dropped");
                }
            }
            Err(e) => tracing::error!("Failed to serialize socket reply: {:?}", e),
        }
    }

    /// Queue a text frame without waiting
    ///
    /// A closed queue means the writer is gone; `run` exits on its next turn.
    fn send(&self, json: String) -> Result<(), TrySendError<Message>> {
        self.out.try_send(Message::Text(json.into()))
    }
}
