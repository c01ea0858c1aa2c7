//! Write records for batch content loading.
//!
//! An `id` of 0 (or an absent `id`) means "let the database assign one" and
//! is only meaningful for inserts. Article `content` and project
//! `description` arrive as file paths and are replaced with the file text by
//! the loader before anything is written.

use misite_core::ingest::EntityKind;
use misite_core::types::DbId;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WriteArticle {
    #[serde(default)]
    #[validate(range(min = 0, message = "id must not be negative"))]
    pub id: DbId,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Path to the HTML body.
    #[validate(length(min = 1, message = "content path must not be empty"))]
    pub content: String,
    #[serde(default)]
    pub thumbnail: String,
    #[validate(range(min = 1, message = "serie_id must be positive"))]
    pub serie_id: Option<DbId>,
    pub serie_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WriteProject {
    #[serde(default)]
    #[validate(range(min = 0, message = "id must not be negative"))]
    pub id: DbId,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub synopsis: String,
    /// Path to the HTML description.
    #[validate(length(min = 1, message = "description path must not be empty"))]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
    #[validate(range(min = 1, message = "devblog_serie must be positive"))]
    pub devblog_serie: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WriteArticleTag {
    #[serde(default)]
    #[validate(range(min = 0, message = "id must not be negative"))]
    pub id: DbId,
    #[validate(range(min = 1, message = "article_id must be positive"))]
    pub article_id: DbId,
    #[validate(range(min = 1, message = "tag_id must be positive"))]
    pub tag_id: DbId,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WriteProjectTag {
    #[serde(default)]
    #[validate(range(min = 0, message = "id must not be negative"))]
    pub id: DbId,
    #[validate(range(min = 1, message = "project_id must be positive"))]
    pub project_id: DbId,
    #[validate(range(min = 1, message = "tag_id must be positive"))]
    pub tag_id: DbId,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WriteProjectLink {
    #[serde(default)]
    #[validate(range(min = 0, message = "id must not be negative"))]
    pub id: DbId,
    #[validate(range(min = 1, message = "project_id must be positive"))]
    pub project_id: DbId,
    #[validate(length(min = 1, message = "display_text must not be empty"))]
    pub display_text: String,
    #[validate(url(message = "url must be a valid URL"))]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WriteTag {
    #[serde(default)]
    #[validate(range(min = 0, message = "id must not be negative"))]
    pub id: DbId,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WriteSerie {
    #[serde(default)]
    #[validate(range(min = 0, message = "id must not be negative"))]
    pub id: DbId,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteById {
    #[validate(range(min = 1, message = "id must be positive"))]
    pub id: DbId,
}

/// A homogeneous batch of write records for one table.
#[derive(Debug, Clone)]
pub enum Batch {
    Articles(Vec<WriteArticle>),
    ArticleTags(Vec<WriteArticleTag>),
    Projects(Vec<WriteProject>),
    ProjectTags(Vec<WriteProjectTag>),
    ProjectLinks(Vec<WriteProjectLink>),
    Tags(Vec<WriteTag>),
    Series(Vec<WriteSerie>),
}

impl Batch {
    pub fn kind(&self) -> EntityKind {
        match self {
            Batch::Articles(_) => EntityKind::Articles,
            Batch::ArticleTags(_) => EntityKind::ArticleTags,
            Batch::Projects(_) => EntityKind::Projects,
            Batch::ProjectTags(_) => EntityKind::ProjectTags,
            Batch::ProjectLinks(_) => EntityKind::ProjectLinks,
            Batch::Tags(_) => EntityKind::Tags,
            Batch::Series(_) => EntityKind::Series,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Batch::Articles(v) => v.len(),
            Batch::ArticleTags(v) => v.len(),
            Batch::Projects(v) => v.len(),
            Batch::ProjectTags(v) => v.len(),
            Batch::ProjectLinks(v) => v.len(),
            Batch::Tags(v) => v.len(),
            Batch::Series(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Supplied ids in record order. 0 where the record carries none.
    pub fn ids(&self) -> Vec<DbId> {
        match self {
            Batch::Articles(v) => v.iter().map(|r| r.id).collect(),
            Batch::ArticleTags(v) => v.iter().map(|r| r.id).collect(),
            Batch::Projects(v) => v.iter().map(|r| r.id).collect(),
            Batch::ProjectTags(v) => v.iter().map(|r| r.id).collect(),
            Batch::ProjectLinks(v) => v.iter().map(|r| r.id).collect(),
            Batch::Tags(v) => v.iter().map(|r| r.id).collect(),
            Batch::Series(v) => v.iter().map(|r| r.id).collect(),
        }
    }

    /// Validate every record, stopping at the first invalid one.
    ///
    /// Returns the index of the failing record with its errors.
    pub fn validate(&self) -> Result<(), (usize, ValidationErrors)> {
        match self {
            Batch::Articles(v) => validate_all(v),
            Batch::ArticleTags(v) => validate_all(v),
            Batch::Projects(v) => validate_all(v),
            Batch::ProjectTags(v) => validate_all(v),
            Batch::ProjectLinks(v) => validate_all(v),
            Batch::Tags(v) => validate_all(v),
            Batch::Series(v) => validate_all(v),
        }
    }
}

fn validate_all<T: Validate>(records: &[T]) -> Result<(), (usize, ValidationErrors)> {
    records
        .iter()
        .enumerate()
        .try_for_each(|(idx, record)| record.validate().map_err(|e| (idx, e)))
}
