//! Article models.

use misite_core::flatten::{ChildKind, JoinedRow, SeenChildren};
use misite_core::freshness::Freshness;
use misite_core::pagination::{Cursor, KeysetItem};
use misite_core::ranking::Tagged;
use misite_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::serie::SerieRef;
use crate::models::tag::TagRef;

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// An article on a list page. The body is not loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleListItem {
    pub id: DbId,
    pub title: String,
    pub subtitle: String,
    pub thumbnail: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub freshness: Freshness,
    pub serie: Option<SerieRef>,
    pub tags: Vec<TagRef>,
}

/// One row of the article list query: an article paired with at most one
/// tag and its serie.
#[derive(Debug, Clone, FromRow)]
pub struct ArticleListRow {
    pub id: DbId,
    pub title: String,
    pub subtitle: String,
    pub thumbnail: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub tag_id: Option<DbId>,
    pub tag_name: Option<String>,
    pub serie_id: Option<DbId>,
    pub serie_name: Option<String>,
}

impl JoinedRow for ArticleListRow {
    type Entity = ArticleListItem;

    fn parent_id(&self) -> DbId {
        self.id
    }

    fn to_entity(&self) -> ArticleListItem {
        ArticleListItem {
            id: self.id,
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            thumbnail: self.thumbnail.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            freshness: Freshness::now(self.created_at, self.updated_at),
            serie: None,
            tags: Vec::new(),
        }
    }

    fn merge_into(self, article: &mut ArticleListItem, seen: &mut SeenChildren) {
        merge_tag_and_serie(
            seen,
            (self.tag_id, self.tag_name),
            (self.serie_id, self.serie_name),
            &mut article.tags,
            &mut article.serie,
        );
    }
}

impl KeysetItem for ArticleListItem {
    fn cursor(&self) -> Cursor {
        Cursor::new(self.updated_at, self.id)
    }
}

impl Tagged for ArticleListItem {
    fn tag_ids(&self) -> impl Iterator<Item = DbId> + '_ {
        self.tags.iter().map(|t| t.id)
    }
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// A full article with its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: DbId,
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub thumbnail: String,
    pub serie_order: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub serie: Option<SerieRef>,
    pub tags: Vec<TagRef>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ArticleRow {
    pub id: DbId,
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub thumbnail: String,
    pub serie_order: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub tag_id: Option<DbId>,
    pub tag_name: Option<String>,
    pub serie_id: Option<DbId>,
    pub serie_name: Option<String>,
}

impl JoinedRow for ArticleRow {
    type Entity = Article;

    fn parent_id(&self) -> DbId {
        self.id
    }

    fn to_entity(&self) -> Article {
        Article {
            id: self.id,
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            content: self.content.clone(),
            thumbnail: self.thumbnail.clone(),
            serie_order: self.serie_order,
            created_at: self.created_at,
            updated_at: self.updated_at,
            serie: None,
            tags: Vec::new(),
        }
    }

    fn merge_into(self, article: &mut Article, seen: &mut SeenChildren) {
        merge_tag_and_serie(
            seen,
            (self.tag_id, self.tag_name),
            (self.serie_id, self.serie_name),
            &mut article.tags,
            &mut article.serie,
        );
    }
}

/// Shared by every row shape that carries a tag and a serie.
pub(crate) fn merge_tag_and_serie(
    seen: &mut SeenChildren,
    (tag_id, tag_name): (Option<DbId>, Option<String>),
    (serie_id, serie_name): (Option<DbId>, Option<String>),
    tags: &mut Vec<TagRef>,
    serie: &mut Option<SerieRef>,
) {
    seen.push_once(ChildKind::Tag, tag_id, tags, |id| TagRef {
        id,
        name: tag_name.unwrap_or_default(),
    });
    seen.set_once(ChildKind::Serie, serie_id, serie, |id| SerieRef {
        id,
        name: serie_name.unwrap_or_default(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use misite_core::flatten::flatten;
    use misite_core::ranking::most_frequent_tags;

    fn at(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2023, 3, day, 9, 0, 0).unwrap()
    }

    fn row(id: DbId, tag: Option<(DbId, &str)>, serie: Option<(DbId, &str)>) -> ArticleListRow {
        ArticleListRow {
            id,
            title: format!("article {id}"),
            subtitle: String::new(),
            thumbnail: String::new(),
            created_at: at(1),
            updated_at: at(id as u32 + 1),
            tag_id: tag.map(|t| t.0),
            tag_name: tag.map(|t| t.1.to_string()),
            serie_id: serie.map(|s| s.0),
            serie_name: serie.map(|s| s.1.to_string()),
        }
    }

    /// Cross join an item back into rows, as the list query would return.
    fn expand(item: &ArticleListItem) -> Vec<ArticleListRow> {
        let tags: Vec<Option<&TagRef>> = if item.tags.is_empty() {
            vec![None]
        } else {
            item.tags.iter().map(Some).collect()
        };
        tags.into_iter()
            .map(|tag| ArticleListRow {
                id: item.id,
                title: item.title.clone(),
                subtitle: item.subtitle.clone(),
                thumbnail: item.thumbnail.clone(),
                created_at: item.created_at,
                updated_at: item.updated_at,
                tag_id: tag.map(|t| t.id),
                tag_name: tag.map(|t| t.name.clone()),
                serie_id: item.serie.as_ref().map(|s| s.id),
                serie_name: item.serie.as_ref().map(|s| s.name.clone()),
            })
            .collect()
    }

    #[test]
    fn list_rows_flatten_with_tags_and_serie() {
        let items = flatten(vec![
            row(1, Some((1, "go")), Some((3, "devlog"))),
            row(1, Some((2, "rust")), Some((3, "devlog"))),
            row(2, None, None),
        ]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].tags.len(), 2);
        assert_eq!(items[0].serie.as_ref().map(|s| s.name.as_str()), Some("devlog"));
        assert!(items[1].tags.is_empty());
        assert_eq!(items[1].serie, None);
    }

    #[test]
    fn expanded_items_reflatten_identically() {
        let items = flatten(vec![
            row(1, Some((1, "go")), Some((3, "devlog"))),
            row(1, Some((2, "rust")), Some((3, "devlog"))),
            row(2, None, Some((4, "notes"))),
            row(3, Some((2, "rust")), None),
        ]);
        let rows: Vec<ArticleListRow> = items.iter().flat_map(expand).collect();
        assert_eq!(flatten(rows), items);
    }

    #[test]
    fn cursor_and_tags_feed_pagination_and_ranking() {
        let items = flatten(vec![
            row(1, Some((1, "go")), None),
            row(1, Some((2, "rust")), None),
            row(2, Some((2, "rust")), None),
        ]);
        assert_eq!(items[1].cursor(), Cursor::new(at(3), 2));
        assert_eq!(most_frequent_tags(&items, 1), vec![2]);
    }

    #[test]
    fn list_item_serializes_freshness_inline() {
        let items = flatten(vec![row(1, None, None)]);
        let json = serde_json::to_value(&items[0]).unwrap();
        assert_eq!(json["is_new"], false);
        assert_eq!(json["recently_updated"], false);
        assert!(json["serie"].is_null());
    }
}
