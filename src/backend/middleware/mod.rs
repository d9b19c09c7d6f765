//! Middleware Module
//!
//! This module contains all HTTP middleware for the backend server.
//! Middleware functions are used to process requests before they reach
//! handlers.
//!
//! # Architecture
//!
//! The middleware module currently provides:
//!
//! - **`auth`** - Bearer token authentication for protected routes
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware::from_fn_with_state, Router};
//! use taskboard::backend::middleware::auth_middleware;
//! use taskboard::backend::server::state::AppState;
//!
//! fn protect(router: Router<AppState>, state: AppState) -> Router<AppState> {
//!     router.route_layer(from_fn_with_state(state, auth_middleware))
//! }
//! ```

pub mod auth;

pub use auth::{auth_middleware, authenticate_token, AuthUser, AuthenticatedUser};
