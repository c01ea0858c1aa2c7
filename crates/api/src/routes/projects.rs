use axum::routing::get;
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET /        -> list_projects
/// GET /{id}    -> get_project
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects))
        .route("/{id}", get(projects::get_project))
}

/// Routes mounted at `/explore`.
pub fn explore_router() -> Router<AppState> {
    Router::new().route("/projects", get(projects::explore_projects))
}
