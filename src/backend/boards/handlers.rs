/**
 * Board Handlers
 *
 * - `POST /api/boards` - create a board owned by the requester
 * - `GET /api/boards` - boards the requester belongs to
 * - `GET /api/boards/{id}` - one board with owner and members (members only)
 * - `DELETE /api/boards/{id}` - owner only
 * - `POST /api/boards/{id}/invite` - add an existing user by email (members only)
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::backend::activity::db::{actions, log_activity, NewActivity};
use crate::backend::auth::users::get_user_by_email;
use crate::backend::boards::access::{require_member, require_owner};
use crate::backend::boards::db;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::api::{CreateBoardRequest, InviteRequest, MessageResponse};
use crate::shared::{Board, EntityType};

pub async fn create_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateBoardRequest>,
) -> BackendResult<(StatusCode, Json<Board>)> {
    let pool = state.pool()?;
    let title = request.title.trim();
    if title.is_empty() {
        return Err(BackendError::validation("Title is required"));
    }

    let row = db::create_board(pool, title, user.user_id).await?;
    tracing::info!(board_id = %row.id, owner = %user.user_id, "Board created");

    log_activity(
        pool,
        NewActivity {
            board_id: row.id,
            user_id: user.user_id,
            action: actions::BOARD_CREATED,
            entity_type: EntityType::Board,
            entity_id: row.id,
            message: format!("Created board \"{}\"", row.title),
        },
    )
    .await;

    let board = db::load_board(pool, row).await?;
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn list_boards(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<Json<Vec<Board>>> {
    let pool = state.pool()?;
    let rows = db::list_board_rows_for_member(pool, user.user_id).await?;

    let mut boards = Vec::with_capacity(rows.len());
    for row in rows {
        boards.push(db::load_board(pool, row).await?);
    }
    Ok(Json(boards))
}

pub async fn get_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
) -> BackendResult<Json<Board>> {
    let pool = state.pool()?;
    let row = require_member(pool, board_id, user.user_id).await?;
    Ok(Json(db::load_board(pool, row).await?))
}

pub async fn delete_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
) -> BackendResult<Json<MessageResponse>> {
    let pool = state.pool()?;
    require_owner(pool, board_id, user.user_id).await?;

    db::delete_board(pool, board_id).await?;
    tracing::info!(%board_id, "Board deleted");

    Ok(Json(MessageResponse::new("Board deleted")))
}

/// Invite an existing user to a board
///
/// # Errors
///
/// * `403 Forbidden` - requester is not a member
/// * `404 Not Found` - board or invitee missing
/// * `409 Conflict` - invitee is already a member
pub async fn invite_member(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
    Json(request): Json<InviteRequest>,
) -> BackendResult<Json<MessageResponse>> {
    let pool = state.pool()?;
    require_member(pool, board_id, user.user_id).await?;

    let email = request.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(BackendError::validation("Email is required"));
    }

    let invitee = get_user_by_email(pool, &email)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    if !db::add_member(pool, board_id, invitee.id).await? {
        return Err(BackendError::conflict("User already a member"));
    }
    tracing::info!(%board_id, invitee = %invitee.id, "Member added");

    log_activity(
        pool,
        NewActivity {
            board_id,
            user_id: user.user_id,
            action: actions::MEMBER_INVITED,
            entity_type: EntityType::Board,
            entity_id: board_id,
            message: format!("Invited {}", invitee.email),
        },
    )
    .await;

    Ok(Json(MessageResponse::new("Member added successfully")))
}
