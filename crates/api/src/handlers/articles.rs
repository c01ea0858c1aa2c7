//! Handlers for articles.
//!
//! Two list flavours share one repository query: the admin list pages by
//! offset, the explore list pages by cursor and returns the next one.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use misite_db::repositories::ArticleRepo;

use crate::error::AppResult;
use crate::query::{parse_path_id, ListParams, QueryPairs};
use crate::response::{DataResponse, ListPage};
use crate::state::AppState;

/// GET /articles
///
/// Offset-paged articles filtered by `tagId`/`serieId`/`search`, with the
/// page's most used tags.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> AppResult<impl IntoResponse> {
    let params = ListParams::parse(&pairs)?;
    let items = ArticleRepo::list(&state.pool, &params.filter(), &params.offset()).await?;

    Ok(Json(DataResponse {
        data: ListPage::new(items).with_related_tags(),
    }))
}

/// GET /explore/articles
///
/// Cursor-paged articles, most recently updated first.
pub async fn explore_articles(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> AppResult<impl IntoResponse> {
    let params = ListParams::parse(&pairs)?;
    let pagination = params.keyset();

    let items = ArticleRepo::list(&state.pool, &params.filter(), &pagination).await?;
    tracing::debug!(count = items.len(), "Explored articles");

    Ok(Json(DataResponse {
        data: ListPage::new(items)
            .with_next(pagination.limit())
            .with_related_tags(),
    }))
}

/// GET /articles/{id}
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_path_id("Article", &id)?;
    let article = ArticleRepo::find_by_id(&state.pool, id).await?;

    Ok(Json(DataResponse { data: article }))
}
