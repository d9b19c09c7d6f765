/**
 * Task Database Operations
 *
 * # Transactions
 *
 * `update_task` and `delete_task` run every statement in one transaction, so
 * readers never observe a half-shifted list. Both open it with
 * `BEGIN IMMEDIATE`: the write lock is held before any sibling position is
 * read, and a concurrent move on the same database waits (up to the pool's
 * busy timeout) instead of planning against stale positions.
 *
 * `update_task` also reads the updated task back inside the transaction, so
 * the caller gets the committed state even if a delete follows right after.
 */

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::backend::server::config::begin_write;
use crate::backend::tasks::ordering::{plan_move, plan_removal, RangeShift, Slot};
use crate::shared::{Task, UserSummary};

/// Task row as stored, without assignees
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub board_id: Uuid,
    pub list_id: Uuid,
    pub title: String,
    pub description: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskRow {
    pub fn slot(&self) -> Slot {
        Slot::new(self.list_id, self.position)
    }

    pub fn into_task(self, assigned_to: Vec<UserSummary>) -> Task {
        Task {
            id: self.id,
            board_id: self.board_id,
            list_id: self.list_id,
            title: self.title,
            description: self.description,
            assigned_to,
            position: self.position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Destination of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTarget {
    pub list_id: Uuid,
    pub position: i64,
}

/// Validated changes to apply to one task
///
/// `None` leaves a field untouched. `assignees` replaces the whole set.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignees: Option<Vec<Uuid>>,
    pub target: Option<MoveTarget>,
}

/// Slot of the task before and after an update, and the task as committed
#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdateOutcome {
    pub before: Slot,
    pub after: Slot,
    pub task: Task,
}

impl TaskUpdateOutcome {
    pub fn moved(&self) -> bool {
        self.before != self.after
    }
}

/// Append a task to the end of its list
pub async fn create_task(
    pool: &SqlitePool,
    board_id: Uuid,
    list_id: Uuid,
    title: &str,
    description: &str,
) -> Result<TaskRow, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, TaskRow>(
        r#"
        INSERT INTO tasks (id, board_id, list_id, title, description, position, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, (SELECT COALESCE(MAX(position), -1) + 1 FROM tasks WHERE list_id = ?), ?, ?)
        RETURNING id, board_id, list_id, title, description, position, created_at, updated_at
        "#
    )
    .bind(Uuid::new_v4())
    .bind(board_id)
    .bind(list_id)
    .bind(title)
    .bind(description)
    .bind(list_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn fetch_task_row<'e, E>(executor: E, task_id: Uuid) -> Result<Option<TaskRow>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, TaskRow>(
        r#"
        SELECT id, board_id, list_id, title, description, position, created_at, updated_at
        FROM tasks
        WHERE id = ?
        "#
    )
    .bind(task_id)
    .fetch_optional(executor)
    .await
}

/// Tasks of a list in position order, assignees resolved
pub async fn list_tasks(pool: &SqlitePool, list_id: Uuid) -> Result<Vec<Task>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TaskRow>(
        r#"
        SELECT id, board_id, list_id, title, description, position, created_at, updated_at
        FROM tasks
        WHERE list_id = ?
        ORDER BY position, seq
        "#
    )
    .bind(list_id)
    .fetch_all(pool)
    .await?;

    populate(pool, rows).await
}

#[derive(sqlx::FromRow)]
struct AssigneeRow {
    task_id: Uuid,
    #[sqlx(flatten)]
    user: UserSummary,
}

/// Assignees of each task in `task_ids`, ordered by name
pub async fn load_assignees<'e, E>(
    executor: E,
    task_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<UserSummary>>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut assignees: HashMap<Uuid, Vec<UserSummary>> = HashMap::new();
    if task_ids.is_empty() {
        return Ok(assignees);
    }

    let mut builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
        "SELECT a.task_id, u.id, u.name, u.email \
         FROM task_assignees a JOIN users u ON u.id = a.user_id \
         WHERE a.task_id IN (",
    );
    let mut separated = builder.separated(", ");
    for id in task_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY u.name, u.email");

    let rows = builder.build_query_as::<AssigneeRow>().fetch_all(executor).await?;
    for row in rows {
        assignees.entry(row.task_id).or_default().push(row.user);
    }
    Ok(assignees)
}

/// Resolve assignees for a batch of rows, keeping their order
pub async fn populate<'e, E>(executor: E, rows: Vec<TaskRow>) -> Result<Vec<Task>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let mut assignees = load_assignees(executor, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let assigned_to = assignees.remove(&row.id).unwrap_or_default();
            row.into_task(assigned_to)
        })
        .collect())
}

/// Apply field edits, assignee replacement and a move in one transaction
///
/// Returns `None` if the task does not exist. The caller validates every
/// input first; a negative target position is clamped to 0 here.
pub async fn update_task(
    pool: &SqlitePool,
    task_id: Uuid,
    changes: &TaskChanges,
) -> Result<Option<TaskUpdateOutcome>, sqlx::Error> {
    let mut tx = begin_write(pool).await?;

    let current = sqlx::query_as::<_, (Uuid, i64)>(
        r#"
        UPDATE tasks
        SET title = COALESCE(?, title),
            description = COALESCE(?, description),
            updated_at = ?
        WHERE id = ?
        RETURNING list_id, position
        "#
    )
    .bind(changes.title.as_deref())
    .bind(changes.description.as_deref())
    .bind(Utc::now())
    .bind(task_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some((list_id, position)) = current else {
        return Ok(None);
    };
    let before = Slot::new(list_id, position);

    if let Some(assignees) = &changes.assignees {
        sqlx::query("DELETE FROM task_assignees WHERE task_id = ?")
            .bind(task_id)
            .execute(&mut *tx)
            .await?;

        for user_id in assignees {
            sqlx::query("INSERT OR IGNORE INTO task_assignees (task_id, user_id) VALUES (?, ?)")
                .bind(task_id)
                .bind(*user_id)
                .execute(&mut *tx)
                .await?;
        }
    }

    let mut after = before;
    if let Some(target) = changes.target {
        let siblings = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tasks WHERE list_id = ? AND id <> ?"
        )
        .bind(target.list_id)
        .bind(task_id)
        .fetch_one(&mut *tx)
        .await?;

        let plan = plan_move(before, target.list_id, target.position, siblings);
        if !plan.is_noop(before) {
            for shift in &plan.shifts {
                apply_shift(&mut tx, task_id, shift).await?;
            }

            sqlx::query("UPDATE tasks SET list_id = ?, position = ? WHERE id = ?")
                .bind(plan.placement.list_id)
                .bind(plan.placement.position)
                .bind(task_id)
                .execute(&mut *tx)
                .await?;
        }
        after = plan.placement;
    }

    let row = fetch_task_row(&mut *tx, task_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    let task = populate(&mut *tx, vec![row])
        .await?
        .pop()
        .ok_or(sqlx::Error::RowNotFound)?;

    tx.commit().await?;
    Ok(Some(TaskUpdateOutcome { before, after, task }))
}

/// Delete a task and close the gap it leaves in its list
///
/// Returns the deleted row, or `None` if it did not exist.
pub async fn delete_task(pool: &SqlitePool, task_id: Uuid) -> Result<Option<TaskRow>, sqlx::Error> {
    let mut tx = begin_write(pool).await?;

    let removed = sqlx::query_as::<_, TaskRow>(
        r#"
        DELETE FROM tasks
        WHERE id = ?
        RETURNING id, board_id, list_id, title, description, position, created_at, updated_at
        "#
    )
    .bind(task_id)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(row) = &removed {
        apply_shift(&mut tx, task_id, &plan_removal(row.slot())).await?;
    }

    tx.commit().await?;
    Ok(removed)
}

async fn apply_shift(
    conn: &mut SqliteConnection,
    moved: Uuid,
    shift: &RangeShift,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE tasks
        SET position = position + ?
        WHERE list_id = ? AND id <> ? AND position >= ? AND (? IS NULL OR position <= ?)
        "#
    )
    .bind(shift.delta)
    .bind(shift.list_id)
    .bind(moved)
    .bind(shift.from)
    .bind(shift.to)
    .bind(shift.to)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// `(task id, position)` of a list in position order
pub async fn list_positions(pool: &SqlitePool, list_id: Uuid) -> Result<Vec<(Uuid, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (Uuid, i64)>(
        "SELECT id, position FROM tasks WHERE list_id = ? ORDER BY position, seq"
    )
    .bind(list_id)
    .fetch_all(pool)
    .await
}
