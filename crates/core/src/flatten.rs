//! Row flattening for one-to-many joins.
//!
//! A `LEFT JOIN` across parent and child tables yields one row per
//! (parent, child) pairing, with child columns `NULL` when the parent has no
//! children. [`flatten`] folds such a result set back into nested entities in
//! a single pass:
//!
//! - a new entity starts whenever the parent id changes;
//! - child ids are tracked per parent so repeated children (from the cross
//!   product of two independent joins) are appended only once;
//! - a parent with no children still yields exactly one entity.
//!
//! Rows for one parent must be contiguous, which every list query guarantees
//! by ordering on the parent key first.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// The kind of child a joined row can carry. Ids are only unique per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    Tag,
    Link,
    Serie,
    Article,
    Project,
}

/// Child ids already attached to the current parent.
#[derive(Debug, Default)]
pub struct SeenChildren {
    seen: HashSet<(ChildKind, DbId)>,
}

impl SeenChildren {
    /// Record a child id. Returns `true` the first time it is seen.
    pub fn first_sighting(&mut self, kind: ChildKind, id: DbId) -> bool {
        self.seen.insert((kind, id))
    }

    /// Append a child built by `make` unless its id is null or already seen.
    pub fn push_once<T>(
        &mut self,
        kind: ChildKind,
        id: Option<DbId>,
        list: &mut Vec<T>,
        make: impl FnOnce(DbId) -> T,
    ) {
        if let Some(id) = id {
            if self.first_sighting(kind, id) {
                list.push(make(id));
            }
        }
    }

    /// Fill a to-one association the first time a non-null id shows up.
    pub fn set_once<T>(
        &mut self,
        kind: ChildKind,
        id: Option<DbId>,
        slot: &mut Option<T>,
        make: impl FnOnce(DbId) -> T,
    ) {
        if let Some(id) = id {
            if slot.is_none() && self.first_sighting(kind, id) {
                *slot = Some(make(id));
            }
        }
    }

    fn reset(&mut self) {
        self.seen.clear();
    }
}

/// A flat, denormalized row produced by a parent/child join.
pub trait JoinedRow {
    /// The nested entity the rows fold into.
    type Entity;

    /// Id of the parent this row belongs to.
    fn parent_id(&self) -> DbId;

    /// Build a childless entity from the parent columns.
    fn to_entity(&self) -> Self::Entity;

    /// Attach this row's non-null children to `entity`.
    fn merge_into(self, entity: &mut Self::Entity, seen: &mut SeenChildren);
}

/// Fold joined rows into entities, preserving parent order.
pub fn flatten<R, I>(rows: I) -> Vec<R::Entity>
where
    R: JoinedRow,
    I: IntoIterator<Item = R>,
{
    let mut entities = Vec::new();
    let mut current: Option<DbId> = None;
    let mut seen = SeenChildren::default();

    for row in rows {
        let parent_id = row.parent_id();
        if current != Some(parent_id) {
            current = Some(parent_id);
            seen.reset();
            entities.push(row.to_entity());
        }
        if let Some(entity) = entities.last_mut() {
            row.merge_into(entity, &mut seen);
        }
    }

    entities
}

/// Fold the rows of a single-entity fetch.
///
/// Zero rows is [`CoreError::NotFound`]. More than one distinct parent means
/// the query was not keyed on a unique id and is reported as internal.
pub fn flatten_one<R, I>(rows: I, entity: &'static str, id: DbId) -> Result<R::Entity, CoreError>
where
    R: JoinedRow,
    I: IntoIterator<Item = R>,
{
    let mut entities = flatten(rows);
    match entities.len() {
        0 => Err(CoreError::NotFound { entity, id }),
        1 => entities
            .pop()
            .ok_or_else(|| CoreError::Internal(format!("{entity} {id} vanished"))),
        n => Err(CoreError::Internal(format!(
            "expected one {entity} with id {id}, found {n}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Debug, Clone, PartialEq)]
    struct Post {
        id: DbId,
        title: String,
        tags: Vec<(DbId, String)>,
        links: Vec<DbId>,
        serie: Option<DbId>,
    }

    #[derive(Debug, Clone)]
    struct PostRow {
        id: DbId,
        title: String,
        tag_id: Option<DbId>,
        tag_name: Option<String>,
        link_id: Option<DbId>,
        serie_id: Option<DbId>,
    }

    impl JoinedRow for PostRow {
        type Entity = Post;

        fn parent_id(&self) -> DbId {
            self.id
        }

        fn to_entity(&self) -> Post {
            Post {
                id: self.id,
                title: self.title.clone(),
                tags: Vec::new(),
                links: Vec::new(),
                serie: None,
            }
        }

        fn merge_into(self, post: &mut Post, seen: &mut SeenChildren) {
            let tag_name = self.tag_name;
            seen.push_once(ChildKind::Tag, self.tag_id, &mut post.tags, |id| {
                (id, tag_name.unwrap_or_default())
            });
            seen.push_once(ChildKind::Link, self.link_id, &mut post.links, |id| id);
            seen.set_once(ChildKind::Serie, self.serie_id, &mut post.serie, |id| id);
        }
    }

    fn row(id: DbId, tag: Option<DbId>, link: Option<DbId>, serie: Option<DbId>) -> PostRow {
        PostRow {
            id,
            title: format!("post {id}"),
            tag_id: tag,
            tag_name: tag.map(|t| format!("tag{t}")),
            link_id: link,
            serie_id: serie,
        }
    }

    /// Cross join an entity back into rows, as the database would.
    fn expand(post: &Post) -> Vec<PostRow> {
        let tags: Vec<Option<DbId>> = if post.tags.is_empty() {
            vec![None]
        } else {
            post.tags.iter().map(|(id, _)| Some(*id)).collect()
        };
        let links: Vec<Option<DbId>> = if post.links.is_empty() {
            vec![None]
        } else {
            post.links.iter().copied().map(Some).collect()
        };
        let mut rows = Vec::new();
        for tag in &tags {
            for link in &links {
                rows.push(PostRow {
                    id: post.id,
                    title: post.title.clone(),
                    tag_id: *tag,
                    tag_name: tag.map(|t| format!("tag{t}")),
                    link_id: *link,
                    serie_id: post.serie,
                });
            }
        }
        rows
    }

    #[test]
    fn zero_rows_yield_no_entities() {
        let posts: Vec<Post> = flatten(Vec::<PostRow>::new());
        assert!(posts.is_empty());
    }

    #[test]
    fn childless_parent_yields_one_entity() {
        let posts = flatten(vec![row(1, None, None, None)]);
        assert_eq!(posts.len(), 1);
        assert!(posts[0].tags.is_empty());
        assert!(posts[0].links.is_empty());
        assert_eq!(posts[0].serie, None);
    }

    #[test]
    fn cross_product_children_are_deduplicated() {
        // Two tags x two links = four rows for one parent.
        let rows = vec![
            row(1, Some(10), Some(100), Some(7)),
            row(1, Some(10), Some(101), Some(7)),
            row(1, Some(11), Some(100), Some(7)),
            row(1, Some(11), Some(101), Some(7)),
        ];
        let posts = flatten(rows);
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].tags,
            vec![(10, "tag10".to_string()), (11, "tag11".to_string())]
        );
        assert_eq!(posts[0].links, vec![100, 101]);
        assert_eq!(posts[0].serie, Some(7));
    }

    #[test]
    fn parent_order_is_preserved() {
        let rows = vec![
            row(3, Some(1), None, None),
            row(3, Some(2), None, None),
            row(1, None, None, None),
            row(2, Some(1), None, None),
        ];
        let ids: Vec<DbId> = flatten(rows).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn seen_set_resets_between_parents() {
        let rows = vec![row(1, Some(5), None, None), row(2, Some(5), None, None)];
        let posts = flatten(rows);
        assert_eq!(posts[0].tags.len(), 1);
        assert_eq!(posts[1].tags.len(), 1);
    }

    #[test]
    fn same_id_different_kind_is_not_a_duplicate() {
        let posts = flatten(vec![row(1, Some(5), Some(5), Some(5))]);
        assert_eq!(posts[0].tags.len(), 1);
        assert_eq!(posts[0].links, vec![5]);
        assert_eq!(posts[0].serie, Some(5));
    }

    #[test]
    fn reflattening_an_expansion_is_stable() {
        let original = flatten(vec![
            row(1, Some(10), Some(100), Some(7)),
            row(1, Some(11), Some(101), Some(7)),
            row(2, None, None, None),
            row(3, Some(12), None, None),
        ]);
        let expanded: Vec<PostRow> = original.iter().flat_map(expand).collect();
        assert_eq!(flatten(expanded), original);
    }

    #[test]
    fn flatten_one_not_found_on_zero_rows() {
        let result = flatten_one(Vec::<PostRow>::new(), "Post", 9);
        assert_matches!(result, Err(CoreError::NotFound { entity: "Post", id: 9 }));
    }

    #[test]
    fn flatten_one_returns_the_single_parent() {
        let post = flatten_one(
            vec![row(4, Some(1), None, None), row(4, Some(2), None, None)],
            "Post",
            4,
        )
        .unwrap();
        assert_eq!(post.id, 4);
        assert_eq!(post.tags.len(), 2);
    }

    #[test]
    fn flatten_one_rejects_multiple_parents() {
        let result = flatten_one(
            vec![row(4, None, None, None), row(5, None, None, None)],
            "Post",
            4,
        );
        assert_matches!(result, Err(CoreError::Internal(_)));
    }
}
