//! Concurrent moves on one list
//!
//! Runs against a WAL file database so requests really use separate
//! connections. Each move is one transaction that starts with a write, so
//! concurrent moves serialize and the list stays dense whatever the
//! interleaving.

use axum::http::StatusCode;
use futures_util::future::join_all;

use crate::assert_ok;
use crate::common::{assert_dense, FileDatabase, TestApp};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_moves_keep_positions_dense() {
    let db = FileDatabase::new().await;
    let app = TestApp::with_pool(db.pool.clone());
    let ada = app.register("Ada", "ada@example.com").await;
    let board = app.create_board(&ada, "Roadmap").await;
    let todo = app.create_list(&ada, board, "Todo").await;
    let done = app.create_list(&ada, board, "Done").await;

    let mut tasks = Vec::new();
    for i in 0..8 {
        tasks.push(app.create_task(&ada, board, todo, &format!("Task {i}")).await);
    }

    let moves = (0..24).map(|i| {
        let app = app.clone();
        let ada = ada.clone();
        let task = tasks[(i * 5) % tasks.len()];
        let list = if i % 3 == 0 { done } else { todo };
        let position = ((i * 7) % 9) as i64;
        tokio::spawn(async move { app.move_task(&ada, task, list, position).await })
    });

    for result in join_all(moves).await {
        let (status, body) = assert_ok!(result, "move task panicked");
        assert_eq!(status, StatusCode::OK, "move failed: {}", body);
    }

    let todo_positions: Vec<i64> = app.titles(&ada, todo).await.into_iter().map(|(_, p)| p).collect();
    let done_positions: Vec<i64> = app.titles(&ada, done).await.into_iter().map(|(_, p)| p).collect();
    assert_dense(&todo_positions);
    assert_dense(&done_positions);
    assert_eq!(todo_positions.len() + done_positions.len(), tasks.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_and_deletes_stay_dense() {
    let db = FileDatabase::new().await;
    let app = TestApp::with_pool(db.pool.clone());
    let ada = app.register("Ada", "ada@example.com").await;
    let board = app.create_board(&ada, "Roadmap").await;
    let list = app.create_list(&ada, board, "Todo").await;

    let mut doomed = Vec::new();
    for i in 0..6 {
        doomed.push(app.create_task(&ada, board, list, &format!("Old {i}")).await);
    }

    let deletes = doomed.into_iter().step_by(2).map(|task| {
        let app = app.clone();
        let ada = ada.clone();
        tokio::spawn(async move { app.delete(&format!("/api/tasks/{task}"), &ada.token).await.0 })
    });
    let creates = (0..6).map(|i| {
        let app = app.clone();
        let ada = ada.clone();
        tokio::spawn(async move {
            app.create_task(&ada, board, list, &format!("New {i}")).await;
            StatusCode::CREATED
        })
    });

    let (deleted, created) = tokio::join!(join_all(deletes), join_all(creates));
    for status in deleted.into_iter().chain(created) {
        assert!(assert_ok!(status).is_success());
    }

    let positions: Vec<i64> = app.titles(&ada, list).await.into_iter().map(|(_, p)| p).collect();
    assert_eq!(positions.len(), 9);
    assert_dense(&positions);
}
