/**
 * Task Handlers
 *
 * - `POST /api/tasks` - append a task to a list
 * - `GET /api/tasks/{list_id}` - tasks of a list in position order
 * - `PUT /api/tasks/{id}` - edit fields, replace assignees, move
 * - `DELETE /api/tasks/{id}` - delete and compact the list
 * - `GET /api/tasks/search` - full-text search within a board
 *
 * Every request is validated completely before the first write, so a
 * rejected request leaves the board untouched. Successful mutations are
 * published to the board's channel and recorded in its activity feed.
 */

use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::activity::{actions, log_activity, NewActivity};
use crate::backend::auth::users::count_existing_users;
use crate::backend::boards::db::count_members_among;
use crate::backend::boards::require_member;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::lists::db::get_list;
use crate::backend::middleware::{AuthUser, AuthenticatedUser};
use crate::backend::server::state::AppState;
use crate::backend::tasks::db::{self, MoveTarget, TaskChanges, TaskRow};
use crate::backend::tasks::search::search_tasks;
use crate::shared::api::{CreateTaskRequest, MessageResponse, SearchQuery, UpdateTaskRequest};
use crate::shared::{BoardEvent, EntityType, SearchHit, Task};

pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateTaskRequest>,
) -> BackendResult<(StatusCode, Json<Task>)> {
    let pool = state.pool()?;
    let title = request.title.trim();
    let (board_id, list_id) = match (request.board_id, request.list_id) {
        (Some(board_id), Some(list_id)) if !title.is_empty() => (board_id, list_id),
        _ => return Err(BackendError::validation("title, listId and boardId are required")),
    };

    require_member(pool, board_id, user.user_id).await?;

    let list = get_list(pool, list_id)
        .await?
        .ok_or_else(|| BackendError::not_found("List not found"))?;
    if list.board_id != board_id {
        return Err(BackendError::validation("List does not belong to this board"));
    }

    let description = request.description.as_deref().unwrap_or_default();
    let task = db::create_task(pool, board_id, list_id, title, description)
        .await?
        .into_task(Vec::new());
    tracing::info!(task_id = %task.id, %list_id, position = task.position, "Task created");

    record(pool, &user, &task, actions::TASK_CREATED, "Created").await;
    state.publisher.publish(BoardEvent::task_created(task.clone()));

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_list_tasks(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(list_id): Path<Uuid>,
) -> BackendResult<Json<Vec<Task>>> {
    let pool = state.pool()?;
    let list = get_list(pool, list_id)
        .await?
        .ok_or_else(|| BackendError::not_found("List not found"))?;
    require_member(pool, list.board_id, user.user_id).await?;

    Ok(Json(db::list_tasks(pool, list_id).await?))
}

/// Edit and/or move a task
///
/// The request is a move when it carries `position`; `listId` then selects
/// the destination list (default: the current one). Without `position` only
/// the supplied fields change.
///
/// # Errors
///
/// * `404 Not Found` - task, destination list or an assignee missing
/// * `403 Forbidden` - requester is not a member of the task's board
/// * `400 Bad Request` - malformed `assignedTo`, assignee not a member,
///   destination list on another board, negative position, empty title
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(task_id): Path<Uuid>,
    Json(request): Json<UpdateTaskRequest>,
) -> BackendResult<Json<Task>> {
    let pool = state.pool()?;
    let current = db::fetch_task_row(pool, task_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Task not found"))?;
    require_member(pool, current.board_id, user.user_id).await?;

    let changes = validate_update(pool, &current, request).await?;
    let outcome = db::update_task(pool, task_id, &changes)
        .await?
        .ok_or_else(|| BackendError::not_found("Task not found"))?;

    let task = &outcome.task;

    if outcome.moved() {
        tracing::info!(
            %task_id,
            from_list = %outcome.before.list_id,
            from = outcome.before.position,
            to_list = %outcome.after.list_id,
            to = outcome.after.position,
            "Task moved"
        );
        record(pool, &user, task, actions::TASK_MOVED, "Moved").await;
    } else {
        tracing::info!(%task_id, "Task updated");
        record(pool, &user, task, actions::TASK_UPDATED, "Updated").await;
    }

    state.publisher.publish(BoardEvent::task_updated(task.clone()));
    Ok(Json(outcome.task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(task_id): Path<Uuid>,
) -> BackendResult<Json<MessageResponse>> {
    let pool = state.pool()?;
    let current = db::fetch_task_row(pool, task_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Task not found"))?;
    require_member(pool, current.board_id, user.user_id).await?;

    let removed = db::delete_task(pool, task_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Task not found"))?;
    tracing::info!(%task_id, list_id = %removed.list_id, position = removed.position, "Task deleted");

    log_activity(
        pool,
        NewActivity {
            board_id: removed.board_id,
            user_id: user.user_id,
            action: actions::TASK_DELETED,
            entity_type: EntityType::Task,
            entity_id: removed.id,
            message: format!("Deleted task \"{}\"", removed.title),
        },
    )
    .await;
    state
        .publisher
        .publish(BoardEvent::task_deleted(removed.board_id, removed.id));

    Ok(Json(MessageResponse::new("Task deleted successfully")))
}

pub async fn search_board_tasks(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<SearchQuery>,
) -> BackendResult<Json<Vec<SearchHit>>> {
    let pool = state.pool()?;
    let board_id = match query.board_id {
        Some(board_id) if !query.query.trim().is_empty() => board_id,
        _ => return Err(BackendError::validation("Board ID and search query are required")),
    };
    require_member(pool, board_id, user.user_id).await?;

    Ok(Json(search_tasks(pool, board_id, &query.query).await?))
}

/// Check every part of an update request against the task's board
async fn validate_update(
    pool: &SqlitePool,
    current: &TaskRow,
    request: UpdateTaskRequest,
) -> BackendResult<TaskChanges> {
    if request.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
        return Err(BackendError::validation("title cannot be empty"));
    }

    let assignees = match &request.assigned_to {
        Some(value) => Some(validate_assignees(pool, current.board_id, value).await?),
        None => None,
    };

    let target = match request.position {
        Some(position) if position < 0 => {
            return Err(BackendError::validation("position must be a non-negative integer"));
        }
        Some(position) => {
            let list_id = request.list_id.unwrap_or(current.list_id);
            if list_id != current.list_id {
                let list = get_list(pool, list_id)
                    .await?
                    .ok_or_else(|| BackendError::not_found("List not found"))?;
                if list.board_id != current.board_id {
                    return Err(BackendError::validation("Target list belongs to another board"));
                }
            }
            Some(MoveTarget { list_id, position })
        }
        None => {
            if request.list_id.is_some_and(|list_id| list_id != current.list_id) {
                tracing::debug!(task_id = %current.id, "listId without position ignored");
            }
            None
        }
    };

    Ok(TaskChanges {
        title: request.title.map(|title| title.trim().to_string()),
        description: request.description,
        assignees,
        target,
    })
}

/// `assignedTo` must be an array of ids of existing board members
async fn validate_assignees(
    pool: &SqlitePool,
    board_id: Uuid,
    value: &serde_json::Value,
) -> BackendResult<Vec<Uuid>> {
    let ids: Vec<Uuid> = serde_json::from_value(value.clone())
        .map_err(|_| BackendError::validation("assignedTo must be an array of user IDs"))?;

    let mut seen = HashSet::new();
    let ids: Vec<Uuid> = ids.into_iter().filter(|id| seen.insert(*id)).collect();

    if count_existing_users(pool, &ids).await? != ids.len() {
        return Err(BackendError::not_found("One or more users not found"));
    }
    if count_members_among(pool, board_id, &ids).await? != ids.len() {
        return Err(BackendError::validation("One or more users are not board members"));
    }

    Ok(ids)
}

async fn record(pool: &SqlitePool, user: &AuthenticatedUser, task: &Task, action: &str, verb: &str) {
    log_activity(
        pool,
        NewActivity {
            board_id: task.board_id,
            user_id: user.user_id,
            action,
            entity_type: EntityType::Task,
            entity_id: task.id,
            message: format!("{verb} task \"{}\"", task.title),
        },
    )
    .await;
}
