/**
 * Board Event System
 *
 * This module defines the frames exchanged over the board socket:
 * - `BoardEvent` - task changes fanned out to every participant of a board
 * - `SocketCommand` - join/leave requests sent by a client
 * - `SocketReply` - acknowledgements and errors for those requests
 *
 * Events and replies share the `event` tag so a client can decode any server
 * frame with `ServerFrame`.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::models::Task;

/// A task change on one board
///
/// Created and updated events carry the fully populated task. Deletion only
/// carries the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BoardEvent {
    TaskCreated { board_id: Uuid, task: Task },
    TaskUpdated { board_id: Uuid, task: Task },
    TaskDeleted { board_id: Uuid, task_id: Uuid },
}

impl BoardEvent {
    pub fn task_created(task: Task) -> Self {
        Self::TaskCreated { board_id: task.board_id, task }
    }

    pub fn task_updated(task: Task) -> Self {
        Self::TaskUpdated { board_id: task.board_id, task }
    }

    pub fn task_deleted(board_id: Uuid, task_id: Uuid) -> Self {
        Self::TaskDeleted { board_id, task_id }
    }

    /// Board whose channel receives this event
    pub fn board_id(&self) -> Uuid {
        match self {
            Self::TaskCreated { board_id, .. }
            | Self::TaskUpdated { board_id, .. }
            | Self::TaskDeleted { board_id, .. } => *board_id,
        }
    }

    /// Task the event refers to
    pub fn task_id(&self) -> Uuid {
        match self {
            Self::TaskCreated { task, .. } | Self::TaskUpdated { task, .. } => task.id,
            Self::TaskDeleted { task_id, .. } => *task_id,
        }
    }

    /// Wire name of the event (`taskCreated`, `taskUpdated`, `taskDeleted`)
    pub fn name(&self) -> &'static str {
        match self {
            Self::TaskCreated { .. } => "taskCreated",
            Self::TaskUpdated { .. } => "taskUpdated",
            Self::TaskDeleted { .. } => "taskDeleted",
        }
    }
}

/// Client-to-server socket command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SocketCommand {
    JoinBoard { board_id: Uuid },
    LeaveBoard { board_id: Uuid },
}

impl SocketCommand {
    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Server reply to a `SocketCommand`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SocketReply {
    Joined { board_id: Uuid },
    Left { board_id: Uuid },
    Error { message: String },
}

/// Any frame the server can send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerFrame {
    Event(BoardEvent),
    Reply(SocketReply),
}

impl ServerFrame {
    pub fn parse(text: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(text)?)
    }
}
