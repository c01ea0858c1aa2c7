use axum::routing::get;
use axum::Router;

use crate::handlers::series;
use crate::state::AppState;

/// Routes mounted at `/series`.
///
/// ```text
/// GET /                 -> list_series
/// GET /{id}             -> get_serie
/// GET /{id}/summary     -> serie_summary
/// GET /{id}/articles    -> serie_articles
/// GET /{id}/projects    -> serie_projects
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(series::list_series))
        .route("/{id}", get(series::get_serie))
        .route("/{id}/summary", get(series::serie_summary))
        .route("/{id}/articles", get(series::serie_articles))
        .route("/{id}/projects", get(series::serie_projects))
}
