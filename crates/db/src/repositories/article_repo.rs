//! Repository for the `articles` table and its tag/serie associations.

use misite_core::flatten::{flatten, flatten_one};
use misite_core::pagination::Pagination;
use misite_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::article::{Article, ArticleListItem, ArticleListRow, ArticleRow};
use crate::query_builder::{ListFilter, ListQuery, ListShape, TagLink};

/// List shape: articles with their tags and serie.
const LIST_SHAPE: ListShape = ListShape {
    table: "articles",
    select: "\
        articles.id, articles.title, articles.subtitle, articles.thumbnail, \
        articles.created_at, articles.updated_at, \
        tags.id AS tag_id, tags.name AS tag_name, \
        series.id AS serie_id, series.name AS serie_name",
    joins: "\
        LEFT JOIN article_tags ON article_tags.article_id = articles.id \
        LEFT JOIN tags ON tags.id = article_tags.tag_id \
        LEFT JOIN series ON series.id = articles.serie_id",
    child_order: "tags.name, tags.id",
    cursor_column: "updated_at",
    tags: Some(TagLink {
        table: "article_tags",
        parent_fk: "article_id",
    }),
    serie_fk: Some("serie_id"),
    title_column: None,
};

/// Column list for the single-article query.
const DETAIL_COLUMNS: &str = "\
    articles.id, articles.title, articles.subtitle, articles.content, \
    articles.thumbnail, articles.serie_order, articles.created_at, articles.updated_at, \
    tags.id AS tag_id, tags.name AS tag_name, \
    series.id AS serie_id, series.name AS serie_name";

/// Provides read access to articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// One page of articles matching `filter`.
    pub async fn list(
        pool: &PgPool,
        filter: &ListFilter,
        pagination: &Pagination,
    ) -> Result<Vec<ArticleListItem>, sqlx::Error> {
        let query = ListQuery::build(&LIST_SHAPE, filter, pagination);
        let rows = query.query_as::<ArticleListRow>().fetch_all(pool).await?;
        Ok(flatten(rows))
    }

    /// A single article with its body, tags and serie.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Article, DbError> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM articles \
             LEFT JOIN series ON series.id = articles.serie_id \
             LEFT JOIN article_tags ON article_tags.article_id = articles.id \
             LEFT JOIN tags ON tags.id = article_tags.tag_id \
             WHERE articles.id = $1 \
             ORDER BY tags.name, tags.id"
        );
        let rows = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(id)
            .fetch_all(pool)
            .await?;
        Ok(flatten_one(rows, "Article", id)?)
    }
}
