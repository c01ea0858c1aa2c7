//! Tag models.

use std::str::FromStr;

use misite_core::error::CoreError;
use misite_core::ranking::rank_tag_counts;
use misite_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A tag as embedded in articles and projects.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct TagRef {
    pub id: DbId,
    pub name: String,
}

/// A tag with the number of entities carrying it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct TagUsage {
    pub id: DbId,
    pub name: String,
    pub count: i64,
}

/// Which association tag statistics are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagScope {
    Article,
    Project,
}

impl TagScope {
    /// Junction table and its parent column.
    pub fn junction(self) -> (&'static str, &'static str) {
        match self {
            TagScope::Article => ("article_tags", "article_id"),
            TagScope::Project => ("project_tags", "project_id"),
        }
    }
}

impl FromStr for TagScope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "article" | "articles" => Ok(TagScope::Article),
            "project" | "projects" => Ok(TagScope::Project),
            other => Err(CoreError::parse("by", other)),
        }
    }
}

/// Match counts for a tag set, as parallel sequences ordered by count
/// descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagMatchCounts {
    pub tags: Vec<TagRef>,
    pub counts: Vec<i64>,
}

impl From<Vec<TagUsage>> for TagMatchCounts {
    /// Input is expected in name order; equal counts keep it.
    fn from(usages: Vec<TagUsage>) -> Self {
        let pairs = usages
            .into_iter()
            .map(|u| (TagRef { id: u.id, name: u.name }, u.count))
            .collect();
        let (tags, counts) = rank_tag_counts(pairs);
        Self { tags, counts }
    }
}
