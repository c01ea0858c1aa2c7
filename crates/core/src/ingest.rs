//! Vocabulary for batch content loading: which table, which operation, and
//! the JSON envelope records arrive in.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::CoreError;

/// The table a batch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Articles,
    ArticleTags,
    Projects,
    ProjectTags,
    ProjectLinks,
    Tags,
    Series,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Articles,
        EntityKind::ArticleTags,
        EntityKind::Projects,
        EntityKind::ProjectTags,
        EntityKind::ProjectLinks,
        EntityKind::Tags,
        EntityKind::Series,
    ];

    /// Storage table name.
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Articles => "articles",
            EntityKind::ArticleTags => "article_tags",
            EntityKind::Projects => "projects",
            EntityKind::ProjectTags => "project_tags",
            EntityKind::ProjectLinks => "project_links",
            EntityKind::Tags => "tags",
            EntityKind::Series => "series",
        }
    }

    fn short(self) -> &'static str {
        match self {
            EntityKind::Articles => "a",
            EntityKind::ArticleTags => "at",
            EntityKind::Projects => "p",
            EntityKind::ProjectTags => "pt",
            EntityKind::ProjectLinks => "pl",
            EntityKind::Tags => "t",
            EntityKind::Series => "s",
        }
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.short() == s || kind.table() == s)
            .ok_or_else(|| CoreError::parse("entity", &s))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// What to do with the records of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    /// Insert with database-assigned ids.
    Add,
    /// Upsert keyed on the supplied id.
    Update,
    /// Delete the listed ids.
    Delete,
}

impl FromStr for LoadAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" | "add" => Ok(LoadAction::Add),
            "u" | "update" => Ok(LoadAction::Update),
            "d" | "delete" => Ok(LoadAction::Delete),
            other => Err(CoreError::parse("action", other)),
        }
    }
}

impl fmt::Display for LoadAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadAction::Add => "add",
            LoadAction::Update => "update",
            LoadAction::Delete => "delete",
        })
    }
}

/// Input file shape: `{"data": [...]}`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn entity_accepts_short_and_long_forms() {
        assert_eq!("a".parse::<EntityKind>().unwrap(), EntityKind::Articles);
        assert_eq!("article_tags".parse::<EntityKind>().unwrap(), EntityKind::ArticleTags);
        assert_eq!("PL".parse::<EntityKind>().unwrap(), EntityKind::ProjectLinks);
        assert_eq!("series".parse::<EntityKind>().unwrap(), EntityKind::Series);
    }

    #[test]
    fn unknown_entity_is_a_parse_error() {
        assert_matches!("users".parse::<EntityKind>(), Err(CoreError::Parse(_)));
    }

    #[test]
    fn action_accepts_short_and_long_forms() {
        assert_eq!("a".parse::<LoadAction>().unwrap(), LoadAction::Add);
        assert_eq!("update".parse::<LoadAction>().unwrap(), LoadAction::Update);
        assert_eq!("D".parse::<LoadAction>().unwrap(), LoadAction::Delete);
        assert_matches!("x".parse::<LoadAction>(), Err(CoreError::Parse(_)));
    }

    #[test]
    fn envelope_deserializes() {
        #[derive(Deserialize)]
        struct Row {
            id: i64,
        }
        let env: Envelope<Row> = serde_json::from_str(r#"{"data":[{"id":1},{"id":2}]}"#).unwrap();
        assert_eq!(env.data.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    }
}
