/**
 * Board Socket Client
 *
 * Connects to `GET /ws?token=...`, joins and leaves boards, and yields the
 * server's frames decoded as `ServerFrame`.
 *
 * `join` and `leave` wait for the server's reply. Board events that arrive
 * while waiting are queued and handed out by `next_event` in arrival order.
 */

use std::collections::VecDeque;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

use crate::client::config::ClientConfig;
use crate::client::error::{ClientError, ClientResult};
use crate::shared::{BoardEvent, ServerFrame, SocketCommand, SocketReply};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Timeout for connecting to the server
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct BoardSocket {
    stream: WsStream,
    queued: VecDeque<BoardEvent>,
}

impl BoardSocket {
    pub async fn connect(config: &ClientConfig, token: &str) -> ClientResult<Self> {
        let url = config.socket_url(token);
        let (stream, _) = tokio::time::timeout(CONNECT_TIMEOUT, connect_async(url.as_str()))
            .await
            .map_err(|_| ClientError::ConnectTimeout(config.server_url().to_string()))??;
        tracing::debug!(server = config.server_url(), "Board socket connected");

        Ok(Self {
            stream,
            queued: VecDeque::new(),
        })
    }

    /// Join a board's channel; a refusal comes back as `ClientError::Rejected`
    pub async fn join(&mut self, board_id: Uuid) -> ClientResult<()> {
        self.command(SocketCommand::JoinBoard { board_id }).await
    }

    pub async fn leave(&mut self, board_id: Uuid) -> ClientResult<()> {
        self.command(SocketCommand::LeaveBoard { board_id }).await
    }

    /// Next board event, or `None` once the server closes the socket
    pub async fn next_event(&mut self) -> ClientResult<Option<BoardEvent>> {
        if let Some(event) = self.queued.pop_front() {
            return Ok(Some(event));
        }
        loop {
            match self.next_frame().await? {
                Some(ServerFrame::Event(event)) => return Ok(Some(event)),
                Some(ServerFrame::Reply(reply)) => {
                    tracing::debug!(?reply, "Unsolicited socket reply");
                }
                None => return Ok(None),
            }
        }
    }

    pub async fn close(mut self) -> ClientResult<()> {
        self.stream.close(None).await?;
        Ok(())
    }

    async fn command(&mut self, command: SocketCommand) -> ClientResult<()> {
        self.stream.send(Message::text(command.to_json()?)).await?;

        loop {
            match self.next_frame().await? {
                Some(ServerFrame::Event(event)) => self.queued.push_back(event),
                Some(ServerFrame::Reply(SocketReply::Error { message })) => {
                    return Err(ClientError::Rejected(message));
                }
                Some(ServerFrame::Reply(_)) => return Ok(()),
                None => return Err(ClientError::Socket(WsError::ConnectionClosed)),
            }
        }
    }

    async fn next_frame(&mut self) -> ClientResult<Option<ServerFrame>> {
        while let Some(message) = self.stream.next().await {
            match message? {
                Message::Text(text) => match ServerFrame::parse(text.as_str()) {
                    Ok(frame) => return Ok(Some(frame)),
                    Err(e) => tracing::warn!("Undecodable socket frame: {}", e),
                },
                Message::Close(_) => return Ok(None),
                _ => {}
            }
        }
        Ok(None)
    }
}
