/**
 * List Database Operations
 *
 * Lists are appended at `max(position) + 1` within their board. The position
 * is computed inside the INSERT so two concurrent appends cannot read the
 * same maximum.
 */

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::shared::TaskList;

pub async fn create_list(pool: &SqlitePool, board_id: Uuid, title: &str) -> Result<TaskList, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, TaskList>(
        r#"
        INSERT INTO lists (id, board_id, title, position, created_at, updated_at)
        VALUES (?, ?, ?, (SELECT COALESCE(MAX(position), -1) + 1 FROM lists WHERE board_id = ?), ?, ?)
        RETURNING id, board_id, title, position, created_at
        "#
    )
    .bind(Uuid::new_v4())
    .bind(board_id)
    .bind(title)
    .bind(board_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn get_list(pool: &SqlitePool, list_id: Uuid) -> Result<Option<TaskList>, sqlx::Error> {
    sqlx::query_as::<_, TaskList>(
        "SELECT id, board_id, title, position, created_at FROM lists WHERE id = ?"
    )
    .bind(list_id)
    .fetch_optional(pool)
    .await
}

/// Lists of a board sorted by position
pub async fn lists_for_board(pool: &SqlitePool, board_id: Uuid) -> Result<Vec<TaskList>, sqlx::Error> {
    sqlx::query_as::<_, TaskList>(
        r#"
        SELECT id, board_id, title, position, created_at
        FROM lists
        WHERE board_id = ?
        ORDER BY position, rowid
        "#
    )
    .bind(board_id)
    .fetch_all(pool)
    .await
}
