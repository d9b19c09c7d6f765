//! Board client end-to-end tests
//!
//! One user drags, another watches through the socket; both in-memory boards
//! must end up matching the server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use taskboard::client::{ApiClient, BoardSession, BoardSocket, BoardState, DropTarget};
use uuid::Uuid;

use super::server::RunningServer;

fn snapshot(state: &BoardState) -> Vec<Vec<(Uuid, i64)>> {
    state
        .lists()
        .iter()
        .map(|list| {
            state
                .tasks(list.id)
                .iter()
                .map(|task| (task.id, task.position))
                .collect()
        })
        .collect()
}

async fn server_snapshot(api: &ApiClient, board_id: Uuid) -> Vec<Vec<(Uuid, i64)>> {
    let mut lists = Vec::new();
    for list in api.board_lists(board_id).await.unwrap() {
        let tasks = api.list_tasks(list.id).await.unwrap();
        lists.push(tasks.iter().map(|task| (task.id, task.position)).collect());
    }
    lists
}

#[tokio::test]
async fn test_drag_converges_for_both_clients() {
    let server = RunningServer::start().await;
    let ada = server.client("Ada", "ada@example.com").await;
    let bob = server.client("Bob", "bob@example.com").await;

    let board = ada.create_board("Roadmap").await.unwrap();
    ada.invite(board.id, "bob@example.com").await.unwrap();
    let todo = ada.create_list(board.id, "Todo").await.unwrap();
    let done = ada.create_list(board.id, "Done").await.unwrap();
    let mut tasks = Vec::new();
    for title in ["A", "B", "C"] {
        tasks.push(ada.create_task(board.id, todo.id, title).await.unwrap().id);
    }
    let d = ada.create_task(board.id, done.id, "D").await.unwrap().id;

    let mut ada_session = BoardSession::load(ada.clone(), board.id).await.unwrap();
    let mut bob_session = BoardSession::load(bob.clone(), board.id).await.unwrap();
    let mut bob_socket = BoardSocket::connect(&server.config(), bob.token().unwrap()).await.unwrap();
    bob_socket.join(board.id).await.unwrap();

    // A onto D: Todo [B, C], Done [A, D]
    ada_session.drag_end(tasks[0], DropTarget::Task(d)).unwrap();
    let optimistic = snapshot(ada_session.state());
    assert!(ada_session.pending().is_pending(tasks[0]));

    tokio::time::timeout(Duration::from_secs(5), ada_session.next_outcome())
        .await
        .expect("move outcome");
    assert!(ada_session.pending().is_empty());
    assert!(ada_session.notice().is_none());

    let server_view = server_snapshot(&ada, board.id).await;
    assert_eq!(snapshot(ada_session.state()), optimistic);
    assert_eq!(snapshot(ada_session.state()), server_view);
    assert_eq!(server_view[1][0].0, tasks[0]);

    let event = tokio::time::timeout(Duration::from_secs(5), bob_socket.next_event())
        .await
        .expect("broadcast")
        .unwrap()
        .unwrap();
    bob_session.apply_event(&event);
    bob_session.apply_event(&event);
    assert_eq!(snapshot(bob_session.state()), server_view);
}

#[tokio::test]
async fn test_refused_move_surfaces_notice() {
    let server = RunningServer::start().await;
    let ada = server.client("Ada", "ada@example.com").await;
    let board = ada.create_board("Roadmap").await.unwrap();
    let todo = ada.create_list(board.id, "Todo").await.unwrap();
    let done = ada.create_list(board.id, "Done").await.unwrap();
    let task = ada.create_task(board.id, todo.id, "A").await.unwrap();

    let mut session = BoardSession::load(ada.clone(), board.id).await.unwrap();
    ada.delete_task(task.id).await.unwrap();

    session.drag_end(task.id, DropTarget::List(done.id)).unwrap();
    tokio::time::timeout(Duration::from_secs(5), session.next_outcome())
        .await
        .expect("move outcome");

    assert_eq!(session.take_notice().as_deref(), Some("Could not move task: Task not found"));
    assert!(session.pending().is_empty());
    // The failed drop stays on screen until the board is reloaded
    assert_eq!(session.state().tasks(done.id).len(), 1);

    session.reload().await.unwrap();
    assert_eq!(session.state().task_count(), 0);
    assert_eq!(session.state().lists().len(), 2);
}

#[tokio::test]
async fn test_reload_drops_pending_moves() {
    let server = RunningServer::start().await;
    let ada = server.client("Ada", "ada@example.com").await;
    let board = ada.create_board("Roadmap").await.unwrap();
    let todo = ada.create_list(board.id, "Todo").await.unwrap();
    let done = ada.create_list(board.id, "Done").await.unwrap();
    let task = ada.create_task(board.id, todo.id, "A").await.unwrap();

    let mut session = BoardSession::load(ada.clone(), board.id).await.unwrap();
    session.drag_end(task.id, DropTarget::List(done.id)).unwrap().abort();
    assert!(session.pending().is_pending(task.id));

    session.reload().await.unwrap();
    assert!(session.pending().is_empty());
    assert_eq!(snapshot(session.state()), server_snapshot(&ada, board.id).await);
}
