use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::backend::activity::{actions, log_activity, NewActivity};
use crate::backend::boards::require_member;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::lists::db;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::api::CreateListRequest;
use crate::shared::{EntityType, TaskList};

/// `POST /api/lists`: append a list to a board
pub async fn create_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateListRequest>,
) -> BackendResult<(StatusCode, Json<TaskList>)> {
    let pool = state.pool()?;
    let title = request.title.trim();
    let board_id = match request.board_id {
        Some(board_id) if !title.is_empty() => board_id,
        _ => return Err(BackendError::validation("title and boardId are required")),
    };

    require_member(pool, board_id, user.user_id).await?;
    let list = db::create_list(pool, board_id, title).await?;
    tracing::info!(%board_id, list_id = %list.id, position = list.position, "List created");

    log_activity(
        pool,
        NewActivity {
            board_id,
            user_id: user.user_id,
            action: actions::LIST_CREATED,
            entity_type: EntityType::List,
            entity_id: list.id,
            message: format!("Created list \"{}\"", list.title),
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(list)))
}

/// `GET /api/lists/{board_id}`
pub async fn get_board_lists(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
) -> BackendResult<Json<Vec<TaskList>>> {
    let pool = state.pool()?;
    require_member(pool, board_id, user.user_id).await?;
    Ok(Json(db::lists_for_board(pool, board_id).await?))
}
