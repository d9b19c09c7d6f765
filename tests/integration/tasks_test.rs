//! Task API integration tests
//!
//! Ordering scenarios, creation and deletion, assignee validation and the
//! authorization boundary, all through HTTP.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::assert_api_error;
use taskboard::shared::BoardEvent;

use crate::common::{ordered, TestApp, TestUser};

/// A board owned by Ada with one list holding `titles`
struct Scenario {
    app: TestApp,
    ada: TestUser,
    board: Uuid,
    list: Uuid,
    tasks: Vec<Uuid>,
}

async fn scenario(titles: &[&str]) -> Scenario {
    let app = TestApp::new().await;
    let ada = app.register("Ada", "ada@example.com").await;
    let board = app.create_board(&ada, "Roadmap").await;
    let list = app.create_list(&ada, board, "Todo").await;
    let mut tasks = Vec::new();
    for title in titles {
        tasks.push(app.create_task(&ada, board, list, title).await);
    }
    Scenario { app, ada, board, list, tasks }
}

#[tokio::test]
async fn test_creation_appends() {
    let s = scenario(&["A", "B", "C", "D", "E"]).await;

    let (status, body) = s
        .app
        .post(
            "/api/tasks",
            &s.ada.token,
            json!({ "title": "F", "description": "sixth", "listId": s.list, "boardId": s.board }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["position"], 5);
    assert_eq!(body["description"], "sixth");
    assert_eq!(body["assignedTo"], json!([]));

    let empty = s.app.create_list(&s.ada, s.board, "Empty").await;
    let (_, body) = s
        .app
        .post("/api/tasks", &s.ada.token, json!({ "title": "First", "listId": empty, "boardId": s.board }))
        .await;
    assert_eq!(body["position"], 0);
}

#[tokio::test]
async fn test_move_forward_within_list() {
    let s = scenario(&["A", "B", "C", "D"]).await;

    let (status, body) = s.app.move_task(&s.ada, s.tasks[0], s.list, 2).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["position"], 2);

    assert_eq!(s.app.titles(&s.ada, s.list).await, ordered(&["B", "C", "A", "D"]));
}

#[tokio::test]
async fn test_move_backward_within_list() {
    let s = scenario(&["A", "B", "C", "D"]).await;

    s.app.move_task(&s.ada, s.tasks[3], s.list, 0).await;

    assert_eq!(s.app.titles(&s.ada, s.list).await, ordered(&["D", "A", "B", "C"]));
}

#[tokio::test]
async fn test_move_across_lists() {
    let s = scenario(&["A", "B"]).await;
    let other = s.app.create_list(&s.ada, s.board, "Done").await;
    s.app.create_task(&s.ada, s.board, other, "C").await;

    let (status, body) = s.app.move_task(&s.ada, s.tasks[0], other, 0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["listId"], json!(other));

    assert_eq!(s.app.titles(&s.ada, s.list).await, ordered(&["B"]));
    assert_eq!(s.app.titles(&s.ada, other).await, ordered(&["A", "C"]));

    let (_, feed) = s.app.get(&format!("/api/activity/{}", s.board), &s.ada.token).await;
    assert_eq!(feed[0]["action"], "TASK_MOVED");
}

#[tokio::test]
async fn test_move_past_end_is_clamped() {
    let s = scenario(&["A", "B", "C"]).await;

    let (_, body) = s.app.move_task(&s.ada, s.tasks[0], s.list, 99).await;
    assert_eq!(body["position"], 2);
    assert_eq!(s.app.titles(&s.ada, s.list).await, ordered(&["B", "C", "A"]));
}

#[tokio::test]
async fn test_move_rejections_leave_order_untouched() {
    let s = scenario(&["A", "B"]).await;
    let foreign_board = s.app.create_board(&s.ada, "Elsewhere").await;
    let foreign_list = s.app.create_list(&s.ada, foreign_board, "Todo").await;

    assert_api_error!(
        s.app.move_task(&s.ada, s.tasks[0], s.list, -1).await,
        StatusCode::BAD_REQUEST,
        "position must be a non-negative integer"
    );
    assert_api_error!(
        s.app.move_task(&s.ada, s.tasks[0], foreign_list, 0).await,
        StatusCode::BAD_REQUEST,
        "Target list belongs to another board"
    );
    assert_api_error!(
        s.app.move_task(&s.ada, s.tasks[0], Uuid::new_v4(), 0).await,
        StatusCode::NOT_FOUND,
        "List not found"
    );
    assert_api_error!(
        s.app.move_task(&s.ada, Uuid::new_v4(), s.list, 0).await,
        StatusCode::NOT_FOUND,
        "Task not found"
    );

    assert_eq!(s.app.titles(&s.ada, s.list).await, ordered(&["A", "B"]));
}

#[tokio::test]
async fn test_field_edit_keeps_position() {
    let s = scenario(&["A", "B"]).await;
    let other = s.app.create_list(&s.ada, s.board, "Done").await;

    let (status, body) = s
        .app
        .put(
            &format!("/api/tasks/{}", s.tasks[0]),
            &s.ada.token,
            json!({ "title": "Renamed", "description": "details", "listId": other }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Renamed");
    assert_eq!(body["description"], "details");
    assert_eq!(body["listId"], json!(s.list));

    assert_eq!(s.app.titles(&s.ada, s.list).await, ordered(&["Renamed", "B"]));

    assert_api_error!(
        s.app
            .put(&format!("/api/tasks/{}", s.tasks[0]), &s.ada.token, json!({ "title": " " }))
            .await,
        StatusCode::BAD_REQUEST,
        "title cannot be empty"
    );
}

#[tokio::test]
async fn test_delete_compacts_list() {
    let s = scenario(&["A", "B", "C"]).await;

    let (status, body) = s.app.delete(&format!("/api/tasks/{}", s.tasks[0]), &s.ada.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");

    assert_eq!(s.app.titles(&s.ada, s.list).await, ordered(&["B", "C"]));

    let (_, body) = s
        .app
        .post("/api/tasks", &s.ada.token, json!({ "title": "D", "listId": s.list, "boardId": s.board }))
        .await;
    assert_eq!(body["position"], 2);

    assert_api_error!(
        s.app.delete(&format!("/api/tasks/{}", s.tasks[0]), &s.ada.token).await,
        StatusCode::NOT_FOUND,
        "Task not found"
    );
}

#[tokio::test]
async fn test_assignees_resolved_and_validated() {
    let s = scenario(&["A"]).await;
    let bob = s.app.register("Bob", "bob@example.com").await;
    let eve = s.app.register("Eve", "eve@example.com").await;
    s.app.invite(&s.ada, s.board, "bob@example.com").await;
    let uri = format!("/api/tasks/{}", s.tasks[0]);

    let (status, body) = s
        .app
        .put(&uri, &s.ada.token, json!({ "assignedTo": [bob.id, s.ada.id, bob.id] }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let mut names: Vec<&str> = body["assignedTo"]
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["name"].as_str().unwrap())
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Ada", "Bob"]);
    assert!(body["assignedTo"][0]["email"].is_string());

    // Eve exists but is not a member; the title change must not apply either.
    assert_api_error!(
        s.app
            .put(&uri, &s.ada.token, json!({ "title": "Changed", "assignedTo": [bob.id, eve.id] }))
            .await,
        StatusCode::BAD_REQUEST,
        "One or more users are not board members"
    );
    assert_api_error!(
        s.app.put(&uri, &s.ada.token, json!({ "assignedTo": [Uuid::new_v4()] })).await,
        StatusCode::NOT_FOUND,
        "One or more users not found"
    );
    assert_api_error!(
        s.app.put(&uri, &s.ada.token, json!({ "assignedTo": "bob" })).await,
        StatusCode::BAD_REQUEST,
        "assignedTo must be an array of user IDs"
    );

    let (_, tasks) = s.app.get(&format!("/api/tasks/{}", s.list), &s.ada.token).await;
    assert_eq!(tasks[0]["title"], "A");
    assert_eq!(tasks[0]["assignedTo"].as_array().map(Vec::len), Some(2));

    let (_, body) = s.app.put(&uri, &s.ada.token, json!({ "assignedTo": [] })).await;
    assert_eq!(body["assignedTo"], json!([]));
}

#[tokio::test]
async fn test_non_member_cannot_touch_tasks() {
    let s = scenario(&["A", "B"]).await;
    let eve = s.app.register("Eve", "eve@example.com").await;
    let task_uri = format!("/api/tasks/{}", s.tasks[0]);

    assert_api_error!(
        s.app
            .post("/api/tasks", &eve.token, json!({ "title": "X", "listId": s.list, "boardId": s.board }))
            .await,
        StatusCode::FORBIDDEN,
        "Not authorized"
    );
    assert_api_error!(
        s.app.put(&task_uri, &eve.token, json!({ "listId": s.list, "position": 1 })).await,
        StatusCode::FORBIDDEN,
        "Not authorized"
    );
    assert_api_error!(
        s.app.delete(&task_uri, &eve.token).await,
        StatusCode::FORBIDDEN,
        "Not authorized"
    );
    assert_api_error!(
        s.app
            .post(&format!("/api/boards/{}/invite", s.board), &eve.token, json!({ "email": "eve@example.com" }))
            .await,
        StatusCode::FORBIDDEN,
        "Not authorized"
    );
    assert_api_error!(
        s.app.get(&format!("/api/tasks/{}", s.list), &eve.token).await,
        StatusCode::FORBIDDEN,
        "Not authorized"
    );

    assert_eq!(s.app.titles(&s.ada, s.list).await, ordered(&["A", "B"]));
    let (_, board) = s.app.get(&format!("/api/boards/{}", s.board), &s.ada.token).await;
    assert_eq!(board["members"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_create_task_validation() {
    let s = scenario(&[]).await;
    let foreign_board = s.app.create_board(&s.ada, "Elsewhere").await;

    assert_api_error!(
        s.app.post("/api/tasks", &s.ada.token, json!({ "title": "X", "boardId": s.board })).await,
        StatusCode::BAD_REQUEST,
        "title, listId and boardId are required"
    );
    assert_api_error!(
        s.app
            .post("/api/tasks", &s.ada.token, json!({ "title": "X", "listId": s.list, "boardId": foreign_board }))
            .await,
        StatusCode::BAD_REQUEST,
        "List does not belong to this board"
    );
    assert_api_error!(
        s.app
            .post("/api/tasks", &s.ada.token, json!({ "title": "X", "listId": Uuid::new_v4(), "boardId": s.board }))
            .await,
        StatusCode::NOT_FOUND,
        "List not found"
    );
}

#[tokio::test]
async fn test_mutations_publish_board_events() {
    let (app, events) = TestApp::recording().await;
    let ada = app.register("Ada", "ada@example.com").await;
    let eve = app.register("Eve", "eve@example.com").await;
    let board = app.create_board(&ada, "Roadmap").await;
    let list = app.create_list(&ada, board, "Todo").await;

    let task = app.create_task(&ada, board, list, "A").await;
    app.put(&format!("/api/tasks/{task}"), &ada.token, json!({ "title": "B" })).await;
    app.move_task(&eve, task, list, 0).await;
    app.delete(&format!("/api/tasks/{task}"), &ada.token).await;

    let events = events.take();
    let names: Vec<&str> = events.iter().map(BoardEvent::name).collect();
    assert_eq!(names, vec!["taskCreated", "taskUpdated", "taskDeleted"]);
    assert!(events.iter().all(|event| event.board_id() == board && event.task_id() == task));
    match &events[1] {
        BoardEvent::TaskUpdated { task, .. } => assert_eq!(task.title, "B"),
        other => panic!("Expected taskUpdated, got {other:?}"),
    }
}
