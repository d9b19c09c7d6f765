/**
 * Register Handler
 *
 * This module implements the user registration handler for POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate name, email format and password length
 * 2. Check if user already exists
 * 3. Hash password using bcrypt
 * 4. Create user in database
 * 5. Generate JWT token
 * 6. Return token and user info
 *
 * # Validation
 *
 * - Name, email and password are required
 * - Email must contain '@' character (basic validation)
 * - Password must be at least 8 characters long
 * - Email must be unique (no existing user with same email)
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::hash;

use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{create_user, get_user_by_email};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::shared::api::{AuthResponse, RegisterRequest};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validate a registration request, returning the trimmed name and email
fn validate(request: &RegisterRequest) -> BackendResult<(String, String)> {
    let name = request.name.trim();
    let email = request.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || request.password.is_empty() {
        return Err(BackendError::validation("name, email and password are required"));
    }
    if !email.contains('@') {
        return Err(BackendError::validation("Invalid email address"));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(BackendError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    Ok((name.to_string(), email))
}

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - missing field, invalid email or short password
/// * `409 Conflict` - email already registered
/// * `503 Service Unavailable` - database not configured
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> BackendResult<(StatusCode, Json<AuthResponse>)> {
    let pool = state.pool()?;
    let (name, email) = validate(&request)?;

    if get_user_by_email(pool, &email).await?.is_some() {
        tracing::debug!("Registration for existing email rejected");
        return Err(BackendError::conflict("User already exists"));
    }

    let password_hash = hash(&request.password, state.config.bcrypt_cost)?;

    // The unique index still decides when two registrations race.
    let user = match create_user(pool, &name, &email, &password_hash).await {
        Ok(user) => user,
        Err(e) if e.as_database_error().is_some_and(|db| db.is_unique_violation()) => {
            return Err(BackendError::conflict("User already exists"));
        }
        Err(e) => return Err(e.into()),
    };

    let token = create_token(&state.tokens, user.id, &user.email)?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.summary(),
        }),
    ))
}
