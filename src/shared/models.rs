/**
 * Board Data Model
 *
 * Wire representations of users, boards, lists, tasks and activity entries.
 * Every type serializes with camelCase keys, which is what both the REST API
 * and the board socket carry.
 *
 * # Ordering
 *
 * `Task::position` and `TaskList::position` are zero-based ranks. Within one
 * list, task positions sorted ascending are exactly `0..n`.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Public view of a user (never carries credentials)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A board with its owner and members resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub title: String,
    pub owner: UserSummary,
    pub members: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
}

impl Board {
    /// Whether `user_id` is in the member set
    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.members.iter().any(|member| member.id == user_id)
    }
}

/// A named column of tasks within a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

/// A task with its assignees resolved to name and email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub board_id: Uuid,
    pub list_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assigned_to: Vec<UserSummary>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task returned by full-text search, with its relevance score
///
/// Higher scores are better matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(flatten)]
    pub task: Task,
    pub score: f64,
}

/// Kind of entity an activity entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Board,
    List,
    Task,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Board => "BOARD",
            Self::List => "LIST",
            Self::Task => "TASK",
        }
    }
}

impl std::str::FromStr for EntityType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOARD" => Ok(Self::Board),
            "LIST" => Ok(Self::List),
            "TASK" => Ok(Self::Task),
            other => Err(SharedError::validation(
                "entityType",
                format!("Unknown entity type: {other}"),
            )),
        }
    }
}

/// One line of a board's activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: Uuid,
    pub board_id: Uuid,
    pub user: UserSummary,
    pub action: String,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
