/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Return token and user info
 *
 * # Security
 *
 * - Unknown email and wrong password produce the same 401 message
 * - User passwords are never logged or returned in responses
 */

use axum::{extract::State, response::Json};
use bcrypt::verify;

use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::get_user_by_email;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::shared::api::{AuthResponse, LoginRequest};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - If user is not found or password is incorrect
/// * `503 Service Unavailable` - If database is not configured
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> BackendResult<Json<AuthResponse>> {
    let pool = state.pool()?;
    let email = request.email.trim().to_lowercase();

    let user = get_user_by_email(pool, &email).await?.ok_or_else(|| {
        tracing::debug!("Login for unknown email");
        BackendError::unauthenticated(INVALID_CREDENTIALS)
    })?;

    if !verify(&request.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Invalid password");
        return Err(BackendError::unauthenticated(INVALID_CREDENTIALS));
    }

    let token = create_token(&state.tokens, user.id, &user.email)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: user.summary(),
    }))
}
