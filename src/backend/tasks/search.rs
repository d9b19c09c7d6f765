/**
 * Task Search
 *
 * Full-text search over task titles through the `tasks_fts` FTS5 index
 * (porter stemming, unicode61 tokenizer). Results are ranked by `bm25`;
 * FTS5 reports better matches as more negative values, so the exposed score
 * is `-bm25` and higher is better.
 *
 * User input is never passed to MATCH verbatim: it is split into word tokens
 * and each token is quoted, so FTS5 operators in the query are inert. A task
 * matches if it contains any token; tasks containing more of them rank
 * higher.
 */

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::tasks::db::{populate, TaskRow};
use crate::shared::SearchHit;

/// Upper bound on the number of hits returned
pub const SEARCH_LIMIT: i64 = 50;

/// Turn free text into an FTS5 MATCH expression
///
/// Returns `None` when the text has no searchable tokens.
pub fn build_match_query(text: &str) -> Option<String> {
    let tokens: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| format!("\"{token}\""))
        .collect();

    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" OR "))
    }
}

#[derive(sqlx::FromRow)]
struct SearchRow {
    #[sqlx(flatten)]
    task: TaskRow,
    score: f64,
}

/// Tasks on `board_id` whose title matches `text`, best first
pub async fn search_tasks(pool: &SqlitePool, board_id: Uuid, text: &str) -> Result<Vec<SearchHit>, sqlx::Error> {
    let Some(match_query) = build_match_query(text) else {
        return Ok(Vec::new());
    };

    let rows = sqlx::query_as::<_, SearchRow>(
        r#"
        SELECT t.id, t.board_id, t.list_id, t.title, t.description, t.position,
               t.created_at, t.updated_at, -bm25(tasks_fts) AS score
        FROM tasks_fts
        JOIN tasks t ON t.seq = tasks_fts.rowid
        WHERE tasks_fts MATCH ? AND t.board_id = ?
        ORDER BY score DESC, t.seq
        LIMIT ?
        "#
    )
    .bind(match_query)
    .bind(board_id)
    .bind(SEARCH_LIMIT)
    .fetch_all(pool)
    .await?;

    let (task_rows, scores): (Vec<TaskRow>, Vec<f64>) =
        rows.into_iter().map(|row| (row.task, row.score)).unzip();
    let tasks = populate(pool, task_rows).await?;

    Ok(tasks
        .into_iter()
        .zip(scores)
        .map(|(task, score)| SearchHit { task, score })
        .collect())
}
