//! Serie models: list items, detail with embedded content, summary counts.

use misite_core::flatten::{ChildKind, JoinedRow, SeenChildren};
use misite_core::freshness::Freshness;
use misite_core::pagination::{Cursor, KeysetItem};
use misite_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A serie as embedded in articles and projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerieRef {
    pub id: DbId,
    pub name: String,
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// A row of the serie list query.
#[derive(Debug, Clone, FromRow)]
pub struct SerieListRow {
    pub id: DbId,
    pub name: String,
    pub thumbnail: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerieListItem {
    pub id: DbId,
    pub name: String,
    pub thumbnail: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub freshness: Freshness,
}

impl From<SerieListRow> for SerieListItem {
    fn from(row: SerieListRow) -> Self {
        Self {
            freshness: Freshness::now(row.created_at, row.updated_at),
            id: row.id,
            name: row.name,
            thumbnail: row.thumbnail,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Series paginate on creation time.
impl KeysetItem for SerieListItem {
    fn cursor(&self) -> Cursor {
        Cursor::new(self.created_at, self.id)
    }
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// An article listed under its serie.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SerieArticle {
    pub id: DbId,
    pub title: String,
    pub subtitle: String,
    pub serie_order: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project whose devblog is the serie.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SerieProject {
    pub id: DbId,
    pub name: String,
    pub synopsis: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A serie with its articles (in serie order) and projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerieDetail {
    pub id: DbId,
    pub name: String,
    pub thumbnail: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub articles: Vec<SerieArticle>,
    pub projects: Vec<SerieProject>,
}

/// One row of `series LEFT JOIN articles LEFT JOIN projects`.
#[derive(Debug, Clone, FromRow)]
pub struct SerieDetailRow {
    pub id: DbId,
    pub name: String,
    pub thumbnail: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub article_id: Option<DbId>,
    pub article_title: Option<String>,
    pub article_subtitle: Option<String>,
    pub article_serie_order: Option<i32>,
    pub article_created_at: Option<Timestamp>,
    pub article_updated_at: Option<Timestamp>,
    pub project_id: Option<DbId>,
    pub project_name: Option<String>,
    pub project_synopsis: Option<String>,
    pub project_created_at: Option<Timestamp>,
    pub project_updated_at: Option<Timestamp>,
}

impl JoinedRow for SerieDetailRow {
    type Entity = SerieDetail;

    fn parent_id(&self) -> DbId {
        self.id
    }

    fn to_entity(&self) -> SerieDetail {
        SerieDetail {
            id: self.id,
            name: self.name.clone(),
            thumbnail: self.thumbnail.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            articles: Vec::new(),
            projects: Vec::new(),
        }
    }

    fn merge_into(self, serie: &mut SerieDetail, seen: &mut SeenChildren) {
        // Child timestamps are NOT NULL whenever the child id is present.
        let fallback = self.created_at;
        seen.push_once(ChildKind::Article, self.article_id, &mut serie.articles, |id| {
            SerieArticle {
                id,
                title: self.article_title.unwrap_or_default(),
                subtitle: self.article_subtitle.unwrap_or_default(),
                serie_order: self.article_serie_order,
                created_at: self.article_created_at.unwrap_or(fallback),
                updated_at: self.article_updated_at.unwrap_or(fallback),
            }
        });
        seen.push_once(ChildKind::Project, self.project_id, &mut serie.projects, |id| {
            SerieProject {
                id,
                name: self.project_name.unwrap_or_default(),
                synopsis: self.project_synopsis.unwrap_or_default(),
                created_at: self.project_created_at.unwrap_or(fallback),
                updated_at: self.project_updated_at.unwrap_or(fallback),
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// A serie with the number of articles and projects attached to it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SerieSummary {
    pub id: DbId,
    pub name: String,
    pub thumbnail: String,
    pub description: String,
    pub article_count: i64,
    pub project_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use misite_core::flatten::flatten_one;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
    }

    fn row(article: Option<(DbId, i32)>, project: Option<DbId>) -> SerieDetailRow {
        SerieDetailRow {
            id: 1,
            name: "Devlog".into(),
            thumbnail: String::new(),
            description: "notes".into(),
            created_at: t0(),
            updated_at: t0(),
            article_id: article.map(|a| a.0),
            article_title: article.map(|a| format!("part {}", a.1)),
            article_subtitle: article.map(|_| String::new()),
            article_serie_order: article.map(|a| a.1),
            article_created_at: article.map(|_| t0()),
            article_updated_at: article.map(|_| t0()),
            project_id: project,
            project_name: project.map(|p| format!("project {p}")),
            project_synopsis: project.map(|_| String::new()),
            project_created_at: project.map(|_| t0()),
            project_updated_at: project.map(|_| t0()),
        }
    }

    #[test]
    fn detail_keeps_article_order_and_dedups_cross_product() {
        // Two articles x two projects, ordered by serie_order.
        let rows = vec![
            row(Some((20, 1)), Some(5)),
            row(Some((20, 1)), Some(6)),
            row(Some((10, 2)), Some(5)),
            row(Some((10, 2)), Some(6)),
        ];
        let serie = flatten_one(rows, "Serie", 1).unwrap();
        let ids: Vec<DbId> = serie.articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![20, 10]);
        assert_eq!(serie.projects.len(), 2);
    }

    #[test]
    fn empty_serie_still_yields_the_serie() {
        let serie = flatten_one(vec![row(None, None)], "Serie", 1).unwrap();
        assert!(serie.articles.is_empty());
        assert!(serie.projects.is_empty());
    }

    #[test]
    fn list_item_cursor_uses_created_at() {
        let item = SerieListItem::from(SerieListRow {
            id: 9,
            name: "s".into(),
            thumbnail: String::new(),
            description: String::new(),
            created_at: t0(),
            updated_at: t0() + Duration::days(1),
        });
        assert_eq!(item.cursor(), Cursor::new(t0(), 9));
        assert!(!item.freshness.is_new);
    }
}
