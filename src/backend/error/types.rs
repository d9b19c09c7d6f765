/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Categories
 *
 * ## Request Errors
 *
 * Detected before any mutation and reported with a specific message:
 * - `NotFound` - board, list, task or user missing
 * - `Unauthenticated` - missing or invalid bearer token
 * - `Forbidden` - requester is not a board member, or not the owner
 * - `Validation` - missing fields, malformed assignee lists, bad positions
 * - `Conflict` - duplicate registration, already-a-member invite
 *
 * ## Internal Errors
 *
 * Persistence, hashing and token failures. Their details are logged but never
 * sent to the client.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// Each variant maps to one HTTP status and one category string.
///
/// # Usage
///
/// ```rust
/// use taskboard::backend::error::BackendError;
///
/// let err = BackendError::forbidden("Not authorized");
/// assert_eq!(err.status_code().as_u16(), 403);
/// assert_eq!(err.category(), "authorization");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Board, list, task or user missing
    #[error("{message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Missing, malformed or expired bearer token
    #[error("{message}")]
    Unauthenticated {
        /// Human-readable error message
        message: String,
    },

    /// Requester lacks membership or ownership
    #[error("{message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// Request rejected by input validation
    #[error("{message}")]
    Validation {
        /// Human-readable error message
        message: String,
    },

    /// Request conflicts with existing state
    #[error("{message}")]
    Conflict {
        /// Human-readable error message
        message: String,
    },

    /// No database pool is configured
    #[error("Database not configured")]
    ServiceUnavailable,

    /// Persistence failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Token signing failure
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Password hashing failure
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { message: message.into() }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated { message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden { message: message.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict { message: message.into() }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `NotFound` - 404
    /// - `Unauthenticated` - 401
    /// - `Forbidden` - 403
    /// - `Validation` - 400
    /// - `Conflict` - 409
    /// - `ServiceUnavailable` - 503
    /// - `Database`, `Token`, `PasswordHash` - 500
    /// - `SharedError` - 400 for validation, 500 for serialization
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::Token(_) | Self::PasswordHash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Category reported alongside the message
    pub fn category(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Unauthenticated { .. } => "authentication",
            Self::Forbidden { .. } => "authorization",
            Self::Validation { .. } => "validation",
            Self::Conflict { .. } => "conflict",
            Self::ServiceUnavailable => "unavailable",
            Self::Database(_) | Self::Token(_) | Self::PasswordHash(_) => "internal",
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => "validation",
                SharedError::SerializationError { .. } => "internal",
            },
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error() && !matches!(self, Self::ServiceUnavailable)
    }

    /// Get the client-facing error message
    ///
    /// Internal errors collapse to a generic message.
    pub fn message(&self) -> String {
        if self.is_internal() {
            return "Internal server error".to_string();
        }
        self.to_string()
    }
}
