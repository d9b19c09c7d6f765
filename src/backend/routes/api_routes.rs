/**
 * API Route Wiring
 *
 * Public authentication routes, and everything else behind the bearer-token
 * middleware. `route_layer` applies the middleware only to matched routes,
 * so unknown paths still reach the fallback as 404 instead of 401.
 *
 * `/api/tasks/{id}` is one route: `GET` reads it as a list id, `PUT` and
 * `DELETE` as a task id.
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::backend::activity::handlers::get_board_activity;
use crate::backend::auth::{get_me, login, register};
use crate::backend::boards::handlers::{create_board, delete_board, get_board, invite_member, list_boards};
use crate::backend::lists::handlers::{create_list, get_board_lists};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;
use crate::backend::tasks::handlers::{
    create_task, delete_task, get_list_tasks, search_board_tasks, update_task,
};

/// Configure API routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
/// * `app_state` - State handed to the auth middleware
pub fn configure_api_routes(router: Router<AppState>, app_state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    let protected = Router::new()
        .route("/api/auth/me", get(get_me))
        .route("/api/boards", post(create_board).get(list_boards))
        .route("/api/boards/{id}", get(get_board).delete(delete_board))
        .route("/api/boards/{id}/invite", post(invite_member))
        .route("/api/lists", post(create_list))
        .route("/api/lists/{board_id}", get(get_board_lists))
        .route("/api/tasks", post(create_task))
        .route("/api/tasks/search", get(search_board_tasks))
        .route(
            "/api/tasks/{id}",
            get(get_list_tasks).put(update_task).delete(delete_task),
        )
        .route("/api/activity/{board_id}", get(get_board_activity))
        .route_layer(from_fn_with_state(app_state, auth_middleware));

    router.merge(public).merge(protected)
}
