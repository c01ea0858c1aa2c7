pub mod articles;
pub mod health;
pub mod projects;
pub mod series;
pub mod tags;

use axum::Router;

use crate::state::AppState;

/// Build the content route tree.
///
/// ```text
/// /articles                         admin list (offset, related tags)
/// /articles/{id}                    article detail
/// /explore/articles                 explore list (cursor)
///
/// /projects                         admin list (offset, related tags)
/// /projects/{id}                    project detail with links
/// /explore/projects                 explore list (cursor)
///
/// /series                           list (offset or cursor)
/// /series/{id}                      serie with its articles and projects
/// /series/{id}/summary              content counts
/// /series/{id}/articles             paged articles in reading order
/// /series/{id}/projects             paged devblog projects
///
/// /tags?by=                         tag usage counts
/// /tags/matching?by=&tagId=         match counts for a tag set
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/articles", articles::router())
        .nest("/projects", projects::router())
        .nest("/explore", articles::explore_router().merge(projects::explore_router()))
        .nest("/series", series::router())
        .nest("/tags", tags::router())
}
