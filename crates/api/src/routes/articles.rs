use axum::routing::get;
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

/// Routes mounted at `/articles`.
///
/// ```text
/// GET /        -> list_articles
/// GET /{id}    -> get_article
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(articles::list_articles))
        .route("/{id}", get(articles::get_article))
}

/// Routes mounted at `/explore`.
pub fn explore_router() -> Router<AppState> {
    Router::new().route("/articles", get(articles::explore_articles))
}
