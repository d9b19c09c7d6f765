//! Request and response bodies of the REST API.
//!
//! Required fields are modelled as `Option` so that the server can answer a
//! missing field with a validation message instead of a decoding failure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::models::UserSummary;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    #[serde(default)]
    pub title: String,
    pub board_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub list_id: Option<Uuid>,
    pub board_id: Option<Uuid>,
}

/// Body of `PUT /api/tasks/{id}`
///
/// The presence of `position` makes the request a move; without it only the
/// supplied fields are edited. `assignedTo` is kept as raw JSON so a value of
/// the wrong shape can be reported as a validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<serde_json::Value>,
}

impl UpdateTaskRequest {
    /// A pure move to `position` in `list_id`
    pub fn move_to(list_id: Uuid, position: i64) -> Self {
        Self {
            list_id: Some(list_id),
            position: Some(position),
            ..Self::default()
        }
    }

    /// Replace the assignee set
    pub fn assign(user_ids: &[Uuid]) -> Self {
        Self {
            assigned_to: Some(serde_json::json!(user_ids)),
            ..Self::default()
        }
    }

    pub fn is_move(&self) -> bool {
        self.position.is_some()
    }
}

/// Query string of `GET /api/tasks/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub board_id: Option<Uuid>,
    #[serde(default)]
    pub query: String,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
