/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 * Tokens are HS256-signed and carry the user id, email, issue time and expiry.
 */

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Signing secret and lifetime for session tokens
#[derive(Clone)]
pub struct TokenSettings {
    secret: String,
    ttl: Duration,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>, ttl_days: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::days(ttl_days.max(1)),
        }
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `settings` - Signing secret and lifetime
/// * `user_id` - User ID (UUID)
/// * `email` - User email
///
/// # Returns
/// JWT token string
pub fn create_token(
    settings: &TokenSettings,
    user_id: Uuid,
    email: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: (now + settings.ttl).timestamp().max(0) as u64,
        iat: now.timestamp().max(0) as u64,
    };

    let key = EncodingKey::from_secret(settings.secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
///
/// Fails on a bad signature, a malformed token or an expired token.
pub fn verify_token(
    settings: &TokenSettings,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(settings.secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}
