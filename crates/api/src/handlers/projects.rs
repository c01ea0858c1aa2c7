use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use misite_db::repositories::ProjectRepo;

use crate::error::AppResult;
use crate::query::{parse_path_id, ListParams, QueryPairs};
use crate::response::{DataResponse, ListPage};
use crate::state::AppState;

/// GET /projects
pub async fn list_projects(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> AppResult<impl IntoResponse> {
    let params = ListParams::parse(&pairs)?;
    let items = ProjectRepo::list(&state.pool, &params.filter(), &params.offset()).await?;

    Ok(Json(DataResponse {
        data: ListPage::new(items).with_related_tags(),
    }))
}

/// GET /explore/projects
pub async fn explore_projects(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> AppResult<impl IntoResponse> {
    let params = ListParams::parse(&pairs)?;
    let pagination = params.keyset();

    let items = ProjectRepo::list(&state.pool, &params.filter(), &pagination).await?;
    tracing::debug!(count = items.len(), "Explored projects");

    Ok(Json(DataResponse {
        data: ListPage::new(items)
            .with_next(pagination.limit())
            .with_related_tags(),
    }))
}

/// GET /projects/{id}
///
/// Project with its tags, links and devblog serie.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_path_id("Project", &id)?;
    let project = ProjectRepo::find_by_id(&state.pool, id).await?;

    Ok(Json(DataResponse { data: project }))
}
