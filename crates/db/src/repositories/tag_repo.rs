//! Repository for tag statistics over `article_tags` and `project_tags`.

use misite_core::pagination::Pagination;
use misite_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::{TagMatchCounts, TagScope, TagUsage};

/// Provides tag usage and match-count queries.
pub struct TagRepo;

impl TagRepo {
    /// Tags used by at least one entity of `scope`, with usage counts,
    /// ordered by name.
    pub async fn usage(
        pool: &PgPool,
        scope: TagScope,
        pagination: &Pagination,
    ) -> Result<Vec<TagUsage>, sqlx::Error> {
        let (jt, _) = scope.junction();
        let query = format!(
            "SELECT tags.id, tags.name, COUNT(*) AS count \
             FROM tags \
             JOIN {jt} ON {jt}.tag_id = tags.id \
             GROUP BY tags.id \
             ORDER BY tags.name, tags.id \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, TagUsage>(&query)
            .bind(pagination.limit())
            .bind(pagination.row_offset())
            .fetch_all(pool)
            .await
    }

    /// How many entities of `scope` carry each of `tag_ids`.
    ///
    /// Tags nobody uses are omitted. Result is ordered by count descending,
    /// ties by name.
    pub async fn match_counts(
        pool: &PgPool,
        scope: TagScope,
        tag_ids: &[DbId],
    ) -> Result<TagMatchCounts, sqlx::Error> {
        if tag_ids.is_empty() {
            return Ok(TagMatchCounts::from(Vec::new()));
        }

        let (jt, fk) = scope.junction();
        let query = format!(
            "SELECT tags.id, tags.name, COUNT(DISTINCT {jt}.{fk}) AS count \
             FROM {jt} \
             JOIN tags ON tags.id = {jt}.tag_id \
             WHERE {jt}.tag_id = ANY($1) \
             GROUP BY tags.id \
             ORDER BY tags.name, tags.id"
        );
        let usages = sqlx::query_as::<_, TagUsage>(&query)
            .bind(tag_ids)
            .fetch_all(pool)
            .await?;
        Ok(TagMatchCounts::from(usages))
    }
}
