/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies JWT tokens from the
 * Authorization header and provides the user to handlers.
 *
 * The board socket authenticates with a `token` query parameter instead of
 * a header; both paths go through `authenticate_token`.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::verify_token;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from JWT token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Verify a session token and check that its user still exists
///
/// Every failure is reported as 401 so callers cannot tell a forged token
/// from a deleted account.
pub async fn authenticate_token(app_state: &AppState, token: &str) -> BackendResult<AuthenticatedUser> {
    let claims = verify_token(&app_state.tokens, token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthenticated("Invalid token")
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("Invalid user ID in token: {:?}", e);
        BackendError::unauthenticated("Invalid token")
    })?;

    let pool = app_state.pool()?;
    if get_user_by_id(pool, user_id).await?.is_none() {
        tracing::warn!(%user_id, "Token for unknown user");
        return Err(BackendError::unauthenticated("Invalid token"));
    }

    Ok(AuthenticatedUser {
        user_id,
        email: claims.email,
    })
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts JWT token from Authorization header
/// 2. Verifies the token and that its user exists
/// 3. Attaches user data to request extensions for use in handlers
///
/// Returns 401 Unauthorized if the token is missing or invalid
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!("Missing Authorization header");
            BackendError::unauthenticated("Missing token")
        })?;

    // Extract token (format: "Bearer <token>")
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!("Invalid Authorization header format");
        BackendError::unauthenticated("Missing token")
    })?;

    let user = authenticate_token(&app_state, token.trim()).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Axum extractor for authenticated user
///
/// This can be used as a parameter in handlers to automatically extract
/// the authenticated user from request extensions.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthenticated("Missing token")
            })?;

        Ok(AuthUser(user))
    }
}
