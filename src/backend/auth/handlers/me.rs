/**
 * Get Current User Handler
 *
 * GET /api/auth/me returns the authenticated user without credentials. The
 * auth middleware has already verified the token.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::UserSummary;

pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<Json<UserSummary>> {
    let pool = state.pool()?;
    let user = get_user_by_id(pool, user.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    Ok(Json(user.summary()))
}
