/**
 * Activity Log Persistence
 *
 * Appending is fire-and-forget: `log_activity` never fails the caller. A
 * failed insert is logged and the primary operation carries on.
 */

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::shared::{ActivityEntry, EntityType, UserSummary};

/// Action names written to the feed
pub mod actions {
    pub const BOARD_CREATED: &str = "BOARD_CREATED";
    pub const MEMBER_INVITED: &str = "MEMBER_INVITED";
    pub const LIST_CREATED: &str = "LIST_CREATED";
    pub const TASK_CREATED: &str = "TASK_CREATED";
    pub const TASK_UPDATED: &str = "TASK_UPDATED";
    pub const TASK_MOVED: &str = "TASK_MOVED";
    pub const TASK_DELETED: &str = "TASK_DELETED";
}

/// One activity to append
#[derive(Debug, Clone)]
pub struct NewActivity<'a> {
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub action: &'a str,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub message: String,
}

/// Append an entry to a board's feed
pub async fn log_activity(pool: &SqlitePool, activity: NewActivity<'_>) {
    let result = sqlx::query(
        r#"
        INSERT INTO activity_logs (id, board_id, user_id, action, entity_type, entity_id, message, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#
    )
    .bind(Uuid::new_v4())
    .bind(activity.board_id)
    .bind(activity.user_id)
    .bind(activity.action)
    .bind(activity.entity_type.as_str())
    .bind(activity.entity_id)
    .bind(&activity.message)
    .bind(Utc::now())
    .execute(pool)
    .await;

    if let Err(e) = result {
        tracing::error!(
            board_id = %activity.board_id,
            action = activity.action,
            "Activity log error: {:?}",
            e
        );
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ActivityRow {
    id: Uuid,
    board_id: Uuid,
    action: String,
    entity_type: String,
    entity_id: Uuid,
    message: String,
    created_at: DateTime<Utc>,
    user_id: Uuid,
    user_name: String,
    user_email: String,
}

/// Latest `limit` entries of a board, newest first
pub async fn recent_activity(
    pool: &SqlitePool,
    board_id: Uuid,
    limit: i64,
) -> Result<Vec<ActivityEntry>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ActivityRow>(
        r#"
        SELECT a.id, a.board_id, a.action, a.entity_type, a.entity_id, a.message, a.created_at,
               u.id AS user_id, u.name AS user_name, u.email AS user_email
        FROM activity_logs a
        JOIN users u ON u.id = a.user_id
        WHERE a.board_id = ?
        ORDER BY a.created_at DESC, a.rowid DESC
        LIMIT ?
        "#
    )
    .bind(board_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let entity_type = row
                .entity_type
                .parse::<EntityType>()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

            Ok(ActivityEntry {
                id: row.id,
                board_id: row.board_id,
                user: UserSummary {
                    id: row.user_id,
                    name: row.user_name,
                    email: row.user_email,
                },
                action: row.action,
                entity_type,
                entity_id: row.entity_id,
                message: row.message,
                created_at: row.created_at,
            })
        })
        .collect()
}
