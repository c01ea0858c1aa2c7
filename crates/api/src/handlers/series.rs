//! Handlers for series and the content grouped under them.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use misite_core::pagination::Pagination;
use misite_db::repositories::SerieRepo;

use crate::error::AppResult;
use crate::query::{parse_path_id, ListParams, QueryPairs};
use crate::response::{DataResponse, ListPage};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /series
///
/// Pages by offset unless a `last` cursor is given. `search=title:...`
/// narrows by name.
pub async fn list_series(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> AppResult<impl IntoResponse> {
    let params = ListParams::parse(&pairs)?;
    let pagination = params.pagination();

    let items = SerieRepo::list(&state.pool, &params.filter(), &pagination).await?;
    let page = match pagination {
        Pagination::Keyset { limit, .. } => ListPage::new(items).with_next(limit),
        Pagination::Offset { .. } => ListPage::new(items),
    };

    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// Single serie
// ---------------------------------------------------------------------------

/// GET /series/{id}
pub async fn get_serie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_path_id("Serie", &id)?;
    let serie = SerieRepo::find_by_id(&state.pool, id).await?;

    Ok(Json(DataResponse { data: serie }))
}

/// GET /series/{id}/summary
pub async fn serie_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_path_id("Serie", &id)?;
    let summary = SerieRepo::summary(&state.pool, id).await?;

    Ok(Json(DataResponse { data: summary }))
}

/// GET /series/{id}/articles
///
/// Reading order. An unknown serie yields an empty page.
pub async fn serie_articles(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(pairs): Query<QueryPairs>,
) -> AppResult<impl IntoResponse> {
    let id = parse_path_id("Serie", &id)?;
    let params = ListParams::parse(&pairs)?;
    let items = SerieRepo::articles(&state.pool, id, &params.offset()).await?;

    Ok(Json(DataResponse {
        data: ListPage::new(items),
    }))
}

/// GET /series/{id}/projects
pub async fn serie_projects(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(pairs): Query<QueryPairs>,
) -> AppResult<impl IntoResponse> {
    let id = parse_path_id("Serie", &id)?;
    let params = ListParams::parse(&pairs)?;
    let items = SerieRepo::projects(&state.pool, id, &params.offset()).await?;

    Ok(Json(DataResponse {
        data: ListPage::new(items),
    }))
}
