//! Board socket end-to-end tests

use std::time::Duration;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use taskboard::client::{BoardSocket, ClientError};
use taskboard::shared::BoardEvent;

use super::server::RunningServer;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

async fn next_event(socket: &mut BoardSocket) -> BoardEvent {
    tokio::time::timeout(EVENT_TIMEOUT, socket.next_event())
        .await
        .expect("timed out waiting for board event")
        .expect("socket error")
        .expect("socket closed")
}

#[tokio::test]
async fn test_member_receives_task_events() {
    let server = RunningServer::start().await;
    let ada = server.client("Ada", "ada@example.com").await;
    let bob = server.client("Bob", "bob@example.com").await;

    let board = ada.create_board("Roadmap").await.unwrap();
    ada.invite(board.id, "bob@example.com").await.unwrap();
    let bob_id = bob.me().await.unwrap().id;
    assert!(bob.get_board(board.id).await.unwrap().has_member(bob_id));
    let todo = ada.create_list(board.id, "Todo").await.unwrap();
    let done = ada.create_list(board.id, "Done").await.unwrap();

    let mut socket = BoardSocket::connect(&server.config(), bob.token().unwrap()).await.unwrap();
    socket.join(board.id).await.unwrap();

    let created = ada.create_task(board.id, todo.id, "Write docs").await.unwrap();
    match next_event(&mut socket).await {
        BoardEvent::TaskCreated { board_id, task } => {
            assert_eq!(board_id, board.id);
            assert_eq!(task, created);
        }
        other => panic!("Expected taskCreated, got {other:?}"),
    }

    let assigned = ada.assign(created.id, &[bob_id]).await.unwrap();
    assert_eq!(assigned.assigned_to[0].name, "Bob");
    assert_eq!(next_event(&mut socket).await, BoardEvent::task_updated(assigned));

    let moved = ada
        .move_task(&taskboard::client::MoveRequest {
            task_id: created.id,
            list_id: done.id,
            position: 0,
        })
        .await
        .unwrap();
    assert_eq!(next_event(&mut socket).await, BoardEvent::task_updated(moved));

    ada.delete_task(created.id).await.unwrap();
    assert_eq!(
        next_event(&mut socket).await,
        BoardEvent::task_deleted(board.id, created.id)
    );

    socket.close().await.unwrap();
}

#[tokio::test]
async fn test_non_member_cannot_join() {
    let server = RunningServer::start().await;
    let ada = server.client("Ada", "ada@example.com").await;
    let eve = server.client("Eve", "eve@example.com").await;
    let board = ada.create_board("Roadmap").await.unwrap();

    let mut socket = BoardSocket::connect(&server.config(), eve.token().unwrap()).await.unwrap();
    assert_matches!(
        socket.join(board.id).await,
        Err(ClientError::Rejected(message)) if message == "Not authorized"
    );

    // The connection stays usable after a refused join.
    let own = eve.create_board("Mine").await.unwrap();
    socket.join(own.id).await.unwrap();
}

#[tokio::test]
async fn test_invalid_token_refused_at_upgrade() {
    let server = RunningServer::start().await;
    let result = BoardSocket::connect(&server.config(), "not-a-token").await;
    assert_matches!(result, Err(ClientError::Socket(_)));
}

#[tokio::test]
async fn test_leave_stops_events_for_that_board() {
    let server = RunningServer::start().await;
    let ada = server.client("Ada", "ada@example.com").await;
    let first = ada.create_board("First").await.unwrap();
    let second = ada.create_board("Second").await.unwrap();
    let first_list = ada.create_list(first.id, "Todo").await.unwrap();
    let second_list = ada.create_list(second.id, "Todo").await.unwrap();

    let mut socket = BoardSocket::connect(&server.config(), ada.token().unwrap()).await.unwrap();
    socket.join(first.id).await.unwrap();
    socket.join(second.id).await.unwrap();
    socket.leave(first.id).await.unwrap();

    ada.create_task(first.id, first_list.id, "Unseen").await.unwrap();
    let seen = ada.create_task(second.id, second_list.id, "Seen").await.unwrap();

    assert_eq!(next_event(&mut socket).await, BoardEvent::task_created(seen));
}
