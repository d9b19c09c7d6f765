/**
 * Board Access Checks
 *
 * Shared by every handler that touches board content. Missing boards are
 * reported before membership, so a non-member probing an unknown id gets 404
 * and a non-member probing a real board gets 403.
 */

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::boards::db::{get_board_row, is_member, BoardRow};
use crate::backend::error::{BackendError, BackendResult};

/// Load a board the requester is a member of
pub async fn require_member(pool: &SqlitePool, board_id: Uuid, user_id: Uuid) -> BackendResult<BoardRow> {
    let board = get_board_row(pool, board_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Board not found"))?;

    if !is_member(pool, board_id, user_id).await? {
        tracing::warn!(%board_id, %user_id, "Rejected non-member");
        return Err(BackendError::forbidden("Not authorized"));
    }

    Ok(board)
}

/// Load a board the requester owns
pub async fn require_owner(pool: &SqlitePool, board_id: Uuid, user_id: Uuid) -> BackendResult<BoardRow> {
    let board = get_board_row(pool, board_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Board not found"))?;

    if board.owner_id != user_id {
        tracing::warn!(%board_id, %user_id, "Rejected non-owner");
        return Err(BackendError::forbidden("Not authorized"));
    }

    Ok(board)
}
