//! Bulk writes for the content loader.
//!
//! Every operation runs in a single transaction: either the whole batch is
//! applied or none of it is.

use misite_core::ingest::EntityKind;
use misite_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};

use crate::models::content::Batch;

/// Whether records keep their supplied ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    /// Database assigns ids; supplied ids are ignored.
    Insert,
    /// `ON CONFLICT (id) DO UPDATE` on the supplied id.
    Upsert,
}

/// Writable columns per table, in bind order (excluding `id`).
fn columns(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Articles => &[
            "title",
            "subtitle",
            "content",
            "thumbnail",
            "serie_id",
            "serie_order",
        ],
        EntityKind::ArticleTags => &["article_id", "tag_id"],
        EntityKind::Projects => &[
            "name",
            "synopsis",
            "description",
            "thumbnail",
            "devblog_serie",
        ],
        EntityKind::ProjectTags => &["project_id", "tag_id"],
        EntityKind::ProjectLinks => &["project_id", "display_text", "url"],
        EntityKind::Tags => &["name"],
        EntityKind::Series => &["name", "thumbnail", "description"],
    }
}

/// Tables carrying an `updated_at` column bumped on upsert.
fn has_updated_at(kind: EntityKind) -> bool {
    matches!(
        kind,
        EntityKind::Articles | EntityKind::Projects | EntityKind::Tags | EntityKind::Series
    )
}

fn write_sql(kind: EntityKind, mode: WriteMode) -> String {
    let table = kind.table();
    let cols = columns(kind);
    match mode {
        WriteMode::Insert => {
            let placeholders: Vec<String> = (1..=cols.len()).map(|i| format!("${i}")).collect();
            format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                cols.join(", "),
                placeholders.join(", ")
            )
        }
        WriteMode::Upsert => {
            let placeholders: Vec<String> =
                (1..=cols.len() + 1).map(|i| format!("${i}")).collect();
            let mut sets: Vec<String> = cols
                .iter()
                .map(|c| format!("{c} = EXCLUDED.{c}"))
                .collect();
            if has_updated_at(kind) {
                sets.push("updated_at = now()".to_string());
            }
            format!(
                "INSERT INTO {table} (id, {}) VALUES ({}) \
                 ON CONFLICT (id) DO UPDATE SET {}",
                cols.join(", "),
                placeholders.join(", "),
                sets.join(", ")
            )
        }
    }
}

/// Move the id sequence past the highest id so later inserts do not collide
/// with ids supplied by an upsert.
fn resync_sql(kind: EntityKind) -> String {
    let table = kind.table();
    format!(
        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
         COALESCE(MAX(id), 1), MAX(id) IS NOT NULL) FROM {table}"
    )
}

/// Start a statement, binding the record id first when upserting.
fn start(sql: &str, mode: WriteMode, id: DbId) -> Query<'_, Postgres, PgArguments> {
    let q = sqlx::query(sql);
    match mode {
        WriteMode::Insert => q,
        WriteMode::Upsert => q.bind(id),
    }
}

/// Provides transactional bulk insert, upsert and delete.
pub struct ContentRepo;

impl ContentRepo {
    /// Insert every record with a database-assigned id.
    ///
    /// Returns the number of rows written.
    pub async fn insert(pool: &PgPool, batch: &Batch) -> Result<u64, sqlx::Error> {
        Self::write(pool, batch, WriteMode::Insert).await
    }

    /// Insert or update every record keyed on its supplied id.
    pub async fn upsert(pool: &PgPool, batch: &Batch) -> Result<u64, sqlx::Error> {
        Self::write(pool, batch, WriteMode::Upsert).await
    }

    /// Delete rows of `kind` by id. Returns the number of rows removed.
    pub async fn delete(pool: &PgPool, kind: EntityKind, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = ANY($1)", kind.table());
        let mut tx = pool.begin().await?;
        let result = sqlx::query(&query).bind(ids).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    async fn write(pool: &PgPool, batch: &Batch, mode: WriteMode) -> Result<u64, sqlx::Error> {
        let sql = write_sql(batch.kind(), mode);
        let mut tx = pool.begin().await?;
        let mut affected = 0u64;

        match batch {
            Batch::Articles(records) => {
                for r in records {
                    affected += start(&sql, mode, r.id)
                        .bind(r.title.as_str())
                        .bind(r.subtitle.as_str())
                        .bind(r.content.as_str())
                        .bind(r.thumbnail.as_str())
                        .bind(r.serie_id)
                        .bind(r.serie_order)
                        .execute(&mut *tx)
                        .await?
                        .rows_affected();
                }
            }
            Batch::ArticleTags(records) => {
                for r in records {
                    affected += start(&sql, mode, r.id)
                        .bind(r.article_id)
                        .bind(r.tag_id)
                        .execute(&mut *tx)
                        .await?
                        .rows_affected();
                }
            }
            Batch::Projects(records) => {
                for r in records {
                    affected += start(&sql, mode, r.id)
                        .bind(r.name.as_str())
                        .bind(r.synopsis.as_str())
                        .bind(r.description.as_str())
                        .bind(r.thumbnail.as_str())
                        .bind(r.devblog_serie)
                        .execute(&mut *tx)
                        .await?
                        .rows_affected();
                }
            }
            Batch::ProjectTags(records) => {
                for r in records {
                    affected += start(&sql, mode, r.id)
                        .bind(r.project_id)
                        .bind(r.tag_id)
                        .execute(&mut *tx)
                        .await?
                        .rows_affected();
                }
            }
            Batch::ProjectLinks(records) => {
                for r in records {
                    affected += start(&sql, mode, r.id)
                        .bind(r.project_id)
                        .bind(r.display_text.as_str())
                        .bind(r.url.as_str())
                        .execute(&mut *tx)
                        .await?
                        .rows_affected();
                }
            }
            Batch::Tags(records) => {
                for r in records {
                    affected += start(&sql, mode, r.id)
                        .bind(r.name.as_str())
                        .execute(&mut *tx)
                        .await?
                        .rows_affected();
                }
            }
            Batch::Series(records) => {
                for r in records {
                    affected += start(&sql, mode, r.id)
                        .bind(r.name.as_str())
                        .bind(r.thumbnail.as_str())
                        .bind(r.description.as_str())
                        .execute(&mut *tx)
                        .await?
                        .rows_affected();
                }
            }
        }

        if mode == WriteMode::Upsert {
            sqlx::query(&resync_sql(batch.kind()))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::debug!(table = %batch.kind(), ?mode, affected, "Batch written");
        Ok(affected)
    }
}
