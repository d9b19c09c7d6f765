//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Architecture
//!
//! - **`router`** - Main router creation, middleware layers and fallback
//! - **`api_routes`** - REST endpoints under `/api`
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint wiring
//! ```
//!
//! # Route Types
//!
//! ## Public
//!
//! - `POST /api/auth/register` - User registration
//! - `POST /api/auth/login` - User login
//! - `GET /ws?token=` - Board socket (authenticates with the query token)
//!
//! ## Protected (bearer token)
//!
//! - `GET /api/auth/me`
//! - `/api/boards`, `/api/boards/{id}`, `/api/boards/{id}/invite`
//! - `/api/lists`, `/api/lists/{board_id}`
//! - `/api/tasks`, `/api/tasks/search`, `/api/tasks/{id}`
//! - `GET /api/activity/{board_id}`

/// Main router creation
pub mod router;

/// API endpoint wiring
pub mod api_routes;

pub use router::create_router;
