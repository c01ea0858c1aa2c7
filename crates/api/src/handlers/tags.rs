//! Handlers for tag statistics.
//!
//! Both endpoints are scoped by `by=article|project`. A missing or unknown
//! scope names no listing at all and is reported as not found.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use misite_db::models::tag::TagScope;
use misite_db::repositories::TagRepo;

use crate::error::{AppError, AppResult};
use crate::query::{ListParams, QueryPairs};
use crate::response::{DataResponse, ListPage};
use crate::state::AppState;

fn scope(params: &ListParams) -> AppResult<TagScope> {
    let by = params
        .by
        .as_deref()
        .ok_or_else(|| AppError::NotFound("tag listing requires a 'by' scope".into()))?;
    by.parse()
        .map_err(|_| AppError::NotFound(format!("no tag listing for '{by}'")))
}

/// GET /tags?by=
///
/// Tags in use with their usage counts, ordered by name.
pub async fn list_tags(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> AppResult<impl IntoResponse> {
    let params = ListParams::parse(&pairs)?;
    let scope = scope(&params)?;
    let usages = TagRepo::usage(&state.pool, scope, &params.offset()).await?;

    Ok(Json(DataResponse {
        data: ListPage::new(usages),
    }))
}

/// GET /tags/matching?by=&tagId=
///
/// For each requested tag, how many entities of the scope carry it.
pub async fn matching_tags(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> AppResult<impl IntoResponse> {
    let params = ListParams::parse(&pairs)?;
    let scope = scope(&params)?;
    let filter = params.filter();
    let counts = TagRepo::match_counts(&state.pool, scope, &filter.tag_ids).await?;

    Ok(Json(DataResponse { data: counts }))
}
