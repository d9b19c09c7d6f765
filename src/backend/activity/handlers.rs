use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::backend::activity::db::recent_activity;
use crate::backend::boards::require_member;
use crate::backend::error::BackendResult;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::ActivityEntry;

/// `GET /api/activity/{board_id}`: newest entries first, one page
pub async fn get_board_activity(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
) -> BackendResult<Json<Vec<ActivityEntry>>> {
    let pool = state.pool()?;
    require_member(pool, board_id, user.user_id).await?;

    let limit = state.config.activity_page_size;
    Ok(Json(recent_activity(pool, board_id, limit).await?))
}
