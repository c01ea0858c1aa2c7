//! Repository for the `projects` table, its links, tags and devblog serie.

use misite_core::flatten::{flatten, flatten_one};
use misite_core::pagination::Pagination;
use misite_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::project::{Project, ProjectListItem, ProjectListRow, ProjectRow};
use crate::query_builder::{ListFilter, ListQuery, ListShape, TagLink};

const LIST_SHAPE: ListShape = ListShape {
    table: "projects",
    select: "\
        projects.id, projects.name, projects.synopsis, projects.thumbnail, \
        projects.created_at, projects.updated_at, \
        tags.id AS tag_id, tags.name AS tag_name, \
        series.id AS serie_id, series.name AS serie_name",
    joins: "\
        LEFT JOIN project_tags ON project_tags.project_id = projects.id \
        LEFT JOIN tags ON tags.id = project_tags.tag_id \
        LEFT JOIN series ON series.id = projects.devblog_serie",
    child_order: "tags.name, tags.id",
    cursor_column: "updated_at",
    tags: Some(TagLink {
        table: "project_tags",
        parent_fk: "project_id",
    }),
    serie_fk: Some("devblog_serie"),
    title_column: None,
};

const DETAIL_COLUMNS: &str = "\
    projects.id, projects.name, projects.synopsis, projects.description, \
    projects.thumbnail, projects.created_at, projects.updated_at, \
    tags.id AS tag_id, tags.name AS tag_name, \
    series.id AS serie_id, series.name AS serie_name, \
    project_links.id AS link_id, project_links.display_text AS link_display_text, \
    project_links.url AS link_url";

/// Provides read access to projects.
pub struct ProjectRepo;

impl ProjectRepo {
    pub async fn list(
        pool: &PgPool,
        filter: &ListFilter,
        pagination: &Pagination,
    ) -> Result<Vec<ProjectListItem>, sqlx::Error> {
        let query = ListQuery::build(&LIST_SHAPE, filter, pagination);
        let rows = query.query_as::<ProjectListRow>().fetch_all(pool).await?;
        Ok(flatten(rows))
    }

    /// A single project with description, links, tags and serie.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Project, DbError> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM projects \
             LEFT JOIN project_links ON project_links.project_id = projects.id \
             LEFT JOIN project_tags ON project_tags.project_id = projects.id \
             LEFT JOIN tags ON tags.id = project_tags.tag_id \
             LEFT JOIN series ON series.id = projects.devblog_serie \
             WHERE projects.id = $1 \
             ORDER BY project_links.id, tags.name, tags.id"
        );
        let rows = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_all(pool)
            .await?;
        Ok(flatten_one(rows, "Project", id)?)
    }
}
