//! Project models.

use misite_core::flatten::{ChildKind, JoinedRow, SeenChildren};
use misite_core::freshness::Freshness;
use misite_core::pagination::{Cursor, KeysetItem};
use misite_core::ranking::Tagged;
use misite_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::article::merge_tag_and_serie;
use crate::models::serie::SerieRef;
use crate::models::tag::TagRef;

/// A related link (deployment, repository, write-up).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ProjectLink {
    pub id: DbId,
    pub display_text: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectListItem {
    pub id: DbId,
    pub name: String,
    pub synopsis: String,
    pub thumbnail: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub freshness: Freshness,
    pub serie: Option<SerieRef>,
    pub tags: Vec<TagRef>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProjectListRow {
    pub id: DbId,
    pub name: String,
    pub synopsis: String,
    pub thumbnail: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub tag_id: Option<DbId>,
    pub tag_name: Option<String>,
    pub serie_id: Option<DbId>,
    pub serie_name: Option<String>,
}

impl JoinedRow for ProjectListRow {
    type Entity = ProjectListItem;

    fn parent_id(&self) -> DbId {
        self.id
    }

    fn to_entity(&self) -> ProjectListItem {
        ProjectListItem {
            id: self.id,
            name: self.name.clone(),
            synopsis: self.synopsis.clone(),
            thumbnail: self.thumbnail.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            freshness: Freshness::now(self.created_at, self.updated_at),
            serie: None,
            tags: Vec::new(),
        }
    }

    fn merge_into(self, project: &mut ProjectListItem, seen: &mut SeenChildren) {
        merge_tag_and_serie(
            seen,
            (self.tag_id, self.tag_name),
            (self.serie_id, self.serie_name),
            &mut project.tags,
            &mut project.serie,
        );
    }
}

impl KeysetItem for ProjectListItem {
    fn cursor(&self) -> Cursor {
        Cursor::new(self.updated_at, self.id)
    }
}

impl Tagged for ProjectListItem {
    fn tag_ids(&self) -> impl Iterator<Item = DbId> + '_ {
        self.tags.iter().map(|t| t.id)
    }
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// A full project with description, links, tags and devblog serie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub synopsis: String,
    pub description: String,
    pub thumbnail: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub serie: Option<SerieRef>,
    pub tags: Vec<TagRef>,
    pub links: Vec<ProjectLink>,
}

/// One row of `projects LEFT JOIN project_links LEFT JOIN tags LEFT JOIN series`.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: DbId,
    pub name: String,
    pub synopsis: String,
    pub description: String,
    pub thumbnail: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub tag_id: Option<DbId>,
    pub tag_name: Option<String>,
    pub serie_id: Option<DbId>,
    pub serie_name: Option<String>,
    pub link_id: Option<DbId>,
    pub link_display_text: Option<String>,
    pub link_url: Option<String>,
}

impl JoinedRow for ProjectRow {
    type Entity = Project;

    fn parent_id(&self) -> DbId {
        self.id
    }

    fn to_entity(&self) -> Project {
        Project {
            id: self.id,
            name: self.name.clone(),
            synopsis: self.synopsis.clone(),
            description: self.description.clone(),
            thumbnail: self.thumbnail.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            serie: None,
            tags: Vec::new(),
            links: Vec::new(),
        }
    }

    fn merge_into(self, project: &mut Project, seen: &mut SeenChildren) {
        let (display_text, url) = (self.link_display_text, self.link_url);
        seen.push_once(ChildKind::Link, self.link_id, &mut project.links, |id| {
            ProjectLink {
                id,
                display_text: display_text.unwrap_or_default(),
                url: url.unwrap_or_default(),
            }
        });
        merge_tag_and_serie(
            seen,
            (self.tag_id, self.tag_name),
            (self.serie_id, self.serie_name),
            &mut project.tags,
            &mut project.serie,
        );
    }
}
