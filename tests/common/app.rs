//! In-process app helpers
//!
//! `TestApp` wraps the real router over a migrated database and drives it with
//! `tower::ServiceExt::oneshot`, so every request goes through the auth
//! middleware, extractors and error rendering exactly like in production.

use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;
use uuid::Uuid;

use taskboard::backend::realtime::BoardEventPublisher;
use taskboard::backend::routes::create_router;
use taskboard::backend::server::{config::ServerConfig, AppState};
use taskboard::shared::BoardEvent;

use super::database::memory_pool;

/// Configuration used by every test app
pub fn test_config() -> ServerConfig {
    ServerConfig {
        jwt_secret: "test-secret".to_string(),
        bcrypt_cost: 4,
        ..ServerConfig::default()
    }
}

/// A registered user and their bearer token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

/// Publisher that keeps every event instead of fanning it out
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<BoardEvent>>,
}

impl RecordingPublisher {
    pub fn take(&self) -> Vec<BoardEvent> {
        std::mem::take(&mut *self.events.lock().expect("events lock"))
    }
}

impl BoardEventPublisher for RecordingPublisher {
    fn publish(&self, event: BoardEvent) -> usize {
        self.events.lock().expect("events lock").push(event);
        1
    }
}

#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_pool(memory_pool().await)
    }

    pub fn with_pool(pool: SqlitePool) -> Self {
        let state = AppState::new(Some(pool), test_config());
        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    /// App whose board events are recorded rather than broadcast
    pub async fn recording() -> (Self, Arc<RecordingPublisher>) {
        let publisher = Arc::new(RecordingPublisher::default());
        let state = AppState::new(Some(memory_pool().await), test_config())
            .with_publisher(publisher.clone());
        let app = Self {
            router: create_router(state.clone()),
            state,
        };
        (app, publisher)
    }

    pub fn pool(&self) -> &SqlitePool {
        self.state.pool().expect("test app has a pool")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self.router.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn register(&self, name: &str, email: &str) -> TestUser {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": "password123" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        TestUser {
            id: uuid(&body["user"]["id"]),
            email: email.to_string(),
            token: body["token"].as_str().expect("token").to_string(),
        }
    }

    pub async fn create_board(&self, user: &TestUser, title: &str) -> Uuid {
        let (status, body) = self.post("/api/boards", &user.token, json!({ "title": title })).await;
        assert_eq!(status, StatusCode::CREATED, "create board failed: {}", body);
        uuid(&body["id"])
    }

    pub async fn invite(&self, user: &TestUser, board_id: Uuid, email: &str) {
        let (status, body) = self
            .post(&format!("/api/boards/{board_id}/invite"), &user.token, json!({ "email": email }))
            .await;
        assert_eq!(status, StatusCode::OK, "invite failed: {}", body);
    }

    pub async fn create_list(&self, user: &TestUser, board_id: Uuid, title: &str) -> Uuid {
        let (status, body) = self
            .post("/api/lists", &user.token, json!({ "title": title, "boardId": board_id }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create list failed: {}", body);
        uuid(&body["id"])
    }

    pub async fn create_task(&self, user: &TestUser, board_id: Uuid, list_id: Uuid, title: &str) -> Uuid {
        let (status, body) = self
            .post(
                "/api/tasks",
                &user.token,
                json!({ "title": title, "listId": list_id, "boardId": board_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);
        uuid(&body["id"])
    }

    pub async fn move_task(&self, user: &TestUser, task_id: Uuid, list_id: Uuid, position: i64) -> (StatusCode, Value) {
        self.put(
            &format!("/api/tasks/{task_id}"),
            &user.token,
            json!({ "listId": list_id, "position": position }),
        )
        .await
    }

    /// `(title, position)` of a list's tasks in server order
    pub async fn titles(&self, user: &TestUser, list_id: Uuid) -> Vec<(String, i64)> {
        let (status, body) = self.get(&format!("/api/tasks/{list_id}"), &user.token).await;
        assert_eq!(status, StatusCode::OK, "list tasks failed: {}", body);
        body.as_array()
            .expect("array")
            .iter()
            .map(|task| {
                (
                    task["title"].as_str().expect("title").to_string(),
                    task["position"].as_i64().expect("position"),
                )
            })
            .collect()
    }
}

pub fn uuid(value: &Value) -> Uuid {
    value
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(|| panic!("not a uuid: {}", value))
}

/// Build `(title, position)` pairs numbered from zero
pub fn ordered(titles: &[&str]) -> Vec<(String, i64)> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| (title.to_string(), i as i64))
        .collect()
}
