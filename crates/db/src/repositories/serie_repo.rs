//! Repository for the `series` table and the content attached to a serie.

use misite_core::error::CoreError;
use misite_core::flatten::flatten_one;
use misite_core::pagination::Pagination;
use misite_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::serie::{
    SerieArticle, SerieDetail, SerieDetailRow, SerieListItem, SerieListRow, SerieProject,
    SerieSummary,
};
use crate::query_builder::{ListFilter, ListQuery, ListShape};

/// Series have no joined children; `title:` searches match the name.
const LIST_SHAPE: ListShape = ListShape {
    table: "series",
    select: "\
        series.id, series.name, series.thumbnail, series.description, \
        series.created_at, series.updated_at",
    joins: "",
    child_order: "",
    cursor_column: "created_at",
    tags: None,
    serie_fk: None,
    title_column: Some("name"),
};

const DETAIL_COLUMNS: &str = "\
    series.id, series.name, series.thumbnail, series.description, \
    series.created_at, series.updated_at, \
    articles.id AS article_id, articles.title AS article_title, \
    articles.subtitle AS article_subtitle, articles.serie_order AS article_serie_order, \
    articles.created_at AS article_created_at, articles.updated_at AS article_updated_at, \
    projects.id AS project_id, projects.name AS project_name, \
    projects.synopsis AS project_synopsis, \
    projects.created_at AS project_created_at, projects.updated_at AS project_updated_at";

/// Provides read access to series.
pub struct SerieRepo;

impl SerieRepo {
    pub async fn list(
        pool: &PgPool,
        filter: &ListFilter,
        pagination: &Pagination,
    ) -> Result<Vec<SerieListItem>, sqlx::Error> {
        let query = ListQuery::build(&LIST_SHAPE, filter, pagination);
        let rows = query.query_as::<SerieListRow>().fetch_all(pool).await?;
        Ok(rows.into_iter().map(SerieListItem::from).collect())
    }

    /// A serie with its articles in serie order and its projects.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<SerieDetail, DbError> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM series \
             LEFT JOIN articles ON articles.serie_id = series.id \
             LEFT JOIN projects ON projects.devblog_serie = series.id \
             WHERE series.id = $1 \
             ORDER BY articles.serie_order ASC NULLS LAST, articles.id, projects.id"
        );
        let rows = sqlx::query_as::<_, SerieDetailRow>(&query)
            .bind(id)
            .fetch_all(pool)
            .await?;
        Ok(flatten_one(rows, "Serie", id)?)
    }

    /// Article and project counts for a serie.
    pub async fn summary(pool: &PgPool, id: DbId) -> Result<SerieSummary, DbError> {
        let summary = sqlx::query_as::<_, SerieSummary>(
            "SELECT series.id, series.name, series.thumbnail, series.description, \
                    COUNT(DISTINCT articles.id) AS article_count, \
                    COUNT(DISTINCT projects.id) AS project_count \
             FROM series \
             LEFT JOIN articles ON articles.serie_id = series.id \
             LEFT JOIN projects ON projects.devblog_serie = series.id \
             WHERE series.id = $1 \
             GROUP BY series.id",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        summary.ok_or(DbError::Core(CoreError::NotFound { entity: "Serie", id }))
    }

    /// A page of the serie's articles in reading order.
    pub async fn articles(
        pool: &PgPool,
        serie_id: DbId,
        pagination: &Pagination,
    ) -> Result<Vec<SerieArticle>, sqlx::Error> {
        sqlx::query_as::<_, SerieArticle>(
            "SELECT id, title, subtitle, serie_order, created_at, updated_at \
             FROM articles \
             WHERE serie_id = $1 \
             ORDER BY serie_order ASC NULLS LAST, id \
             LIMIT $2 OFFSET $3",
        )
        .bind(serie_id)
        .bind(pagination.limit())
        .bind(pagination.row_offset())
        .fetch_all(pool)
        .await
    }

    /// A page of projects that use the serie as their devblog.
    pub async fn projects(
        pool: &PgPool,
        serie_id: DbId,
        pagination: &Pagination,
    ) -> Result<Vec<SerieProject>, sqlx::Error> {
        sqlx::query_as::<_, SerieProject>(
            "SELECT id, name, synopsis, created_at, updated_at \
             FROM projects \
             WHERE devblog_serie = $1 \
             ORDER BY id \
             LIMIT $2 OFFSET $3",
        )
        .bind(serie_id)
        .bind(pagination.limit())
        .bind(pagination.row_offset())
        .fetch_all(pool)
        .await
    }
}
