/**
 * Board Database Operations
 *
 * Boards, their owner and their member set. The owner is always a member:
 * `create_board` inserts both rows in one transaction.
 */

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::server::config::begin_write;
use crate::shared::{Board, UserSummary};

/// Board row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BoardRow {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Create a board owned by `owner_id`, who becomes its first member
pub async fn create_board(
    pool: &SqlitePool,
    title: &str,
    owner_id: Uuid,
) -> Result<BoardRow, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = begin_write(pool).await?;

    let board = sqlx::query_as::<_, BoardRow>(
        r#"
        INSERT INTO boards (id, title, owner_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, title, owner_id, created_at
        "#
    )
    .bind(id)
    .bind(title)
    .bind(owner_id)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO board_members (board_id, user_id, joined_at) VALUES (?, ?, ?)")
        .bind(id)
        .bind(owner_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(board)
}

pub async fn get_board_row(pool: &SqlitePool, board_id: Uuid) -> Result<Option<BoardRow>, sqlx::Error> {
    sqlx::query_as::<_, BoardRow>(
        "SELECT id, title, owner_id, created_at FROM boards WHERE id = ?"
    )
    .bind(board_id)
    .fetch_optional(pool)
    .await
}

/// Boards `user_id` belongs to, oldest first
pub async fn list_board_rows_for_member(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<BoardRow>, sqlx::Error> {
    sqlx::query_as::<_, BoardRow>(
        r#"
        SELECT b.id, b.title, b.owner_id, b.created_at
        FROM boards b
        JOIN board_members m ON m.board_id = b.id
        WHERE m.user_id = ?
        ORDER BY b.created_at, b.rowid
        "#
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Members of a board in join order
pub async fn list_members(pool: &SqlitePool, board_id: Uuid) -> Result<Vec<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.name, u.email
        FROM board_members m
        JOIN users u ON u.id = m.user_id
        WHERE m.board_id = ?
        ORDER BY m.joined_at, m.rowid
        "#
    )
    .bind(board_id)
    .fetch_all(pool)
    .await
}

pub async fn is_member(pool: &SqlitePool, board_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let found = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM board_members WHERE board_id = ? AND user_id = ?"
    )
    .bind(board_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(found > 0)
}

/// Count how many of `user_ids` are members of the board
pub async fn count_members_among(
    pool: &SqlitePool,
    board_id: Uuid,
    user_ids: &[Uuid],
) -> Result<usize, sqlx::Error> {
    if user_ids.is_empty() {
        return Ok(0);
    }

    let mut builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
        "SELECT COUNT(*) FROM board_members WHERE board_id = ",
    );
    builder.push_bind(board_id);
    builder.push(" AND user_id IN (");
    let mut separated = builder.separated(", ");
    for id in user_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let count = builder.build_query_scalar::<i64>().fetch_one(pool).await?;
    Ok(count as usize)
}

/// Add a member; returns `false` if they already were one
pub async fn add_member(pool: &SqlitePool, board_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO board_members (board_id, user_id, joined_at) VALUES (?, ?, ?)"
    )
    .bind(board_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Delete a board; lists, tasks, memberships and activity go with it
pub async fn delete_board(pool: &SqlitePool, board_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM boards WHERE id = ?")
        .bind(board_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Resolve owner and members of a stored board
pub async fn load_board(pool: &SqlitePool, row: BoardRow) -> Result<Board, sqlx::Error> {
    let owner = sqlx::query_as::<_, UserSummary>("SELECT id, name, email FROM users WHERE id = ?")
        .bind(row.owner_id)
        .fetch_one(pool)
        .await?;
    let members = list_members(pool, row.id).await?;

    Ok(Board {
        id: row.id,
        title: row.title,
        owner,
        members,
        created_at: row.created_at,
    })
}
