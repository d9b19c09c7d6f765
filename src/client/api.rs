/**
 * REST API Client
 *
 * Thin async wrapper over the server's `/api` routes. Login and register
 * store the returned token; every other call sends it as a bearer token.
 *
 * Non-2xx answers become `ClientError::Api` with the server's message, so a
 * caller can show "Not authorized" or "Task not found" as-is.
 */

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use uuid::Uuid;

use crate::client::board_state::MoveRequest;
use crate::client::config::ClientConfig;
use crate::client::error::{ClientError, ClientResult};
use crate::shared::api::{
    AuthResponse, CreateBoardRequest, CreateListRequest, CreateTaskRequest, InviteRequest,
    LoginRequest, MessageResponse, RegisterRequest, UpdateTaskRequest,
};
use crate::shared::{ActivityEntry, Board, SearchHit, Task, TaskList, UserSummary};

/// Error body rendered by the server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    category: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            token: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> ClientResult<UserSummary> {
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = send(self.http.post(self.config.api_url("/api/auth/register")).json(&request)).await?;
        self.token = Some(response.token);
        Ok(response.user)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<UserSummary> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = send(self.http.post(self.config.api_url("/api/auth/login")).json(&request)).await?;
        self.token = Some(response.token);
        Ok(response.user)
    }

    pub async fn me(&self) -> ClientResult<UserSummary> {
        send(self.get("/api/auth/me")?).await
    }

    pub async fn create_board(&self, title: &str) -> ClientResult<Board> {
        let request = CreateBoardRequest { title: title.to_string() };
        send(self.post("/api/boards")?.json(&request)).await
    }

    pub async fn list_boards(&self) -> ClientResult<Vec<Board>> {
        send(self.get("/api/boards")?).await
    }

    pub async fn get_board(&self, board_id: Uuid) -> ClientResult<Board> {
        send(self.get(&format!("/api/boards/{board_id}"))?).await
    }

    pub async fn delete_board(&self, board_id: Uuid) -> ClientResult<MessageResponse> {
        send(self.authorized(self.http.delete(self.config.api_url(&format!("/api/boards/{board_id}"))))?).await
    }

    pub async fn invite(&self, board_id: Uuid, email: &str) -> ClientResult<MessageResponse> {
        let request = InviteRequest { email: email.to_string() };
        send(self.post(&format!("/api/boards/{board_id}/invite"))?.json(&request)).await
    }

    pub async fn create_list(&self, board_id: Uuid, title: &str) -> ClientResult<TaskList> {
        let request = CreateListRequest {
            title: title.to_string(),
            board_id: Some(board_id),
        };
        send(self.post("/api/lists")?.json(&request)).await
    }

    pub async fn board_lists(&self, board_id: Uuid) -> ClientResult<Vec<TaskList>> {
        send(self.get(&format!("/api/lists/{board_id}"))?).await
    }

    pub async fn create_task(&self, board_id: Uuid, list_id: Uuid, title: &str) -> ClientResult<Task> {
        let request = CreateTaskRequest {
            title: title.to_string(),
            description: None,
            list_id: Some(list_id),
            board_id: Some(board_id),
        };
        send(self.post("/api/tasks")?.json(&request)).await
    }

    pub async fn list_tasks(&self, list_id: Uuid) -> ClientResult<Vec<Task>> {
        send(self.get(&format!("/api/tasks/{list_id}"))?).await
    }

    pub async fn update_task(&self, task_id: Uuid, request: &UpdateTaskRequest) -> ClientResult<Task> {
        let url = self.config.api_url(&format!("/api/tasks/{task_id}"));
        send(self.authorized(self.http.put(url))?.json(request)).await
    }

    pub async fn move_task(&self, request: &MoveRequest) -> ClientResult<Task> {
        self.update_task(request.task_id, &request.to_update()).await
    }

    /// Replace the task's assignees
    pub async fn assign(&self, task_id: Uuid, user_ids: &[Uuid]) -> ClientResult<Task> {
        self.update_task(task_id, &UpdateTaskRequest::assign(user_ids)).await
    }

    pub async fn delete_task(&self, task_id: Uuid) -> ClientResult<MessageResponse> {
        let url = self.config.api_url(&format!("/api/tasks/{task_id}"));
        send(self.authorized(self.http.delete(url))?).await
    }

    pub async fn search(&self, board_id: Uuid, query: &str) -> ClientResult<Vec<SearchHit>> {
        let board_id = board_id.to_string();
        let request = self
            .get("/api/tasks/search")?
            .query(&[("boardId", board_id.as_str()), ("query", query)]);
        send(request).await
    }

    pub async fn activity(&self, board_id: Uuid) -> ClientResult<Vec<ActivityEntry>> {
        send(self.get(&format!("/api/activity/{board_id}"))?).await
    }

    fn get(&self, path: &str) -> ClientResult<RequestBuilder> {
        self.authorized(self.http.get(self.config.api_url(path)))
    }

    fn post(&self, path: &str) -> ClientResult<RequestBuilder> {
        self.authorized(self.http.post(self.config.api_url(path)))
    }

    fn authorized(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await.unwrap_or_default();
    Err(api_error(status, &text))
}

fn api_error(status: StatusCode, text: &str) -> ClientError {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => ClientError::Api {
            status: status.as_u16(),
            category: body.category,
            message: body.error,
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            category: String::new(),
            message: if text.is_empty() {
                status.to_string()
            } else {
                text.to_string()
            },
        },
    }
}
