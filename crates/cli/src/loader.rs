//! Turn a `{"data": [...]}` file into one transactional bulk write.
//!
//! Loading happens in two phases. [`prepare`] reads and parses the source,
//! validates every record, and replaces article `content` and project
//! `description` paths with the referenced file text. Only a fully prepared
//! [`Plan`] reaches [`execute`], so a bad record or a missing body file
//! leaves the database untouched.

use std::fs;
use std::path::{Path, PathBuf};

use misite_core::ingest::{EntityKind, Envelope, LoadAction};
use misite_core::types::DbId;
use misite_db::models::content::{Batch, DeleteById};
use misite_db::repositories::ContentRepo;
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use validator::{Validate, ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}", path = .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}", path = .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("record {index} is invalid: {errors}")]
    Invalid {
        index: usize,
        errors: ValidationErrors,
    },

    #[error("record {index} has no id; updates are keyed on id")]
    MissingId { index: usize },

    #[error("record {index}: failed to read {path}: {source}", path = .path.display())]
    Body {
        index: usize,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A validated, fully resolved batch ready to be written.
#[derive(Debug)]
pub enum Plan {
    /// Insert (`Add`) or upsert (`Update`) the batch.
    Write { action: LoadAction, batch: Batch },
    Delete { kind: EntityKind, ids: Vec<DbId> },
}

impl Plan {
    pub fn kind(&self) -> EntityKind {
        match self {
            Plan::Write { batch, .. } => batch.kind(),
            Plan::Delete { kind, .. } => *kind,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Plan::Write { batch, .. } => batch.len(),
            Plan::Delete { ids, .. } => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Preparation
// ---------------------------------------------------------------------------

/// Read `source` and build the plan for `action` on `kind`.
///
/// Body paths are resolved against the directory holding `source`.
pub fn prepare(source: &Path, kind: EntityKind, action: LoadAction) -> Result<Plan, LoadError> {
    let raw = fs::read_to_string(source).map_err(|e| LoadError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;

    let base = source.parent().unwrap_or_else(|| Path::new(""));
    let plan = match action {
        LoadAction::Delete => {
            let records: Vec<DeleteById> = records(&raw, source)?;
            validate_each(&records)?;
            Plan::Delete {
                kind,
                ids: records.into_iter().map(|r| r.id).collect(),
            }
        }
        LoadAction::Add | LoadAction::Update => {
            let mut batch = parse_batch(&raw, kind, source)?;
            batch
                .validate()
                .map_err(|(index, errors)| LoadError::Invalid { index, errors })?;
            if action == LoadAction::Update {
                require_ids(&batch)?;
            }
            resolve_bodies(&mut batch, base)?;
            Plan::Write { action, batch }
        }
    };

    tracing::debug!(entity = %kind, %action, records = plan.len(), "Prepared batch");
    Ok(plan)
}

fn records<T: DeserializeOwned>(raw: &str, source: &Path) -> Result<Vec<T>, LoadError> {
    serde_json::from_str::<Envelope<T>>(raw)
        .map(|envelope| envelope.data)
        .map_err(|e| LoadError::Parse {
            path: source.to_path_buf(),
            source: e,
        })
}

fn parse_batch(raw: &str, kind: EntityKind, source: &Path) -> Result<Batch, LoadError> {
    Ok(match kind {
        EntityKind::Articles => Batch::Articles(records(raw, source)?),
        EntityKind::ArticleTags => Batch::ArticleTags(records(raw, source)?),
        EntityKind::Projects => Batch::Projects(records(raw, source)?),
        EntityKind::ProjectTags => Batch::ProjectTags(records(raw, source)?),
        EntityKind::ProjectLinks => Batch::ProjectLinks(records(raw, source)?),
        EntityKind::Tags => Batch::Tags(records(raw, source)?),
        EntityKind::Series => Batch::Series(records(raw, source)?),
    })
}

fn validate_each<T: Validate>(records: &[T]) -> Result<(), LoadError> {
    for (index, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|errors| LoadError::Invalid { index, errors })?;
    }
    Ok(())
}

fn require_ids(batch: &Batch) -> Result<(), LoadError> {
    match batch.ids().iter().position(|&id| id < 1) {
        Some(index) => Err(LoadError::MissingId { index }),
        None => Ok(()),
    }
}

/// Replace body paths with file contents.
fn resolve_bodies(batch: &mut Batch, base: &Path) -> Result<(), LoadError> {
    match batch {
        Batch::Articles(records) => {
            for (index, record) in records.iter_mut().enumerate() {
                record.content = read_body(index, base, &record.content)?;
            }
        }
        Batch::Projects(records) => {
            for (index, record) in records.iter_mut().enumerate() {
                record.description = read_body(index, base, &record.description)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn read_body(index: usize, base: &Path, path: &str) -> Result<String, LoadError> {
    let path = base.join(path);
    fs::read_to_string(&path).map_err(|source| LoadError::Body {
        index,
        path,
        source,
    })
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Apply the plan in one transaction. Returns the number of rows affected.
pub async fn execute(pool: &PgPool, plan: &Plan) -> Result<u64, LoadError> {
    let affected = match plan {
        Plan::Write {
            action: LoadAction::Update,
            batch,
        } => ContentRepo::upsert(pool, batch).await?,
        Plan::Write { batch, .. } => ContentRepo::insert(pool, batch).await?,
        Plan::Delete { kind, ids } => ContentRepo::delete(pool, *kind, ids).await?,
    };
    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn article_bodies_are_read_relative_to_the_source() {
        let dir = TempDir::new().unwrap();
        write(&dir, "posts/hello.html", "<p>hello</p>");
        let source = write(
            &dir,
            "articles.json",
            r#"{"data": [{"title": "Hello", "content": "posts/hello.html"}]}"#,
        );

        let plan = prepare(&source, EntityKind::Articles, LoadAction::Add).unwrap();

        assert_matches!(
            plan,
            Plan::Write { action: LoadAction::Add, batch: Batch::Articles(records) }
                if records[0].content == "<p>hello</p>" && records[0].id == 0
        );
    }

    #[test]
    fn project_descriptions_are_resolved() {
        let dir = TempDir::new().unwrap();
        write(&dir, "about.html", "about misite");
        let source = write(
            &dir,
            "projects.json",
            r#"{"data": [{"id": 4, "name": "misite", "description": "about.html"}]}"#,
        );

        let plan = prepare(&source, EntityKind::Projects, LoadAction::Update).unwrap();

        assert_matches!(
            plan,
            Plan::Write { batch: Batch::Projects(records), .. }
                if records[0].description == "about misite"
        );
    }

    #[test]
    fn missing_body_names_the_record() {
        let dir = TempDir::new().unwrap();
        write(&dir, "one.html", "one");
        let source = write(
            &dir,
            "articles.json",
            r#"{"data": [
                {"title": "One", "content": "one.html"},
                {"title": "Two", "content": "two.html"}
            ]}"#,
        );

        let err = prepare(&source, EntityKind::Articles, LoadAction::Add).unwrap_err();

        assert_matches!(err, LoadError::Body { index: 1, ref path, .. } if path.ends_with("two.html"));
    }

    #[test]
    fn invalid_records_fail_before_bodies_are_read() {
        let dir = TempDir::new().unwrap();
        let source = write(
            &dir,
            "articles.json",
            r#"{"data": [{"title": "", "content": "missing.html"}]}"#,
        );

        let err = prepare(&source, EntityKind::Articles, LoadAction::Add).unwrap_err();

        assert_matches!(err, LoadError::Invalid { index: 0, .. });
    }

    #[test]
    fn updates_need_ids() {
        let dir = TempDir::new().unwrap();
        let source = write(
            &dir,
            "tags.json",
            r#"{"data": [{"id": 1, "name": "go"}, {"name": "rust"}]}"#,
        );

        let err = prepare(&source, EntityKind::Tags, LoadAction::Update).unwrap_err();
        assert_matches!(err, LoadError::MissingId { index: 1 });

        let plan = prepare(&source, EntityKind::Tags, LoadAction::Add).unwrap();
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn delete_takes_bare_ids() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "del.json", r#"{"data": [{"id": 3}, {"id": 5}]}"#);

        let plan = prepare(&source, EntityKind::ProjectLinks, LoadAction::Delete).unwrap();

        assert_eq!(plan.kind(), EntityKind::ProjectLinks);
        assert_matches!(plan, Plan::Delete { ids, .. } if ids == vec![3, 5]);
    }

    #[test]
    fn delete_rejects_non_positive_ids() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "del.json", r#"{"data": [{"id": 3}, {"id": 0}]}"#);

        let err = prepare(&source, EntityKind::Tags, LoadAction::Delete).unwrap_err();

        assert_matches!(err, LoadError::Invalid { index: 1, .. });
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "bad.json", r#"{"data": [{"name": 12}]}"#);

        let err = prepare(&source, EntityKind::Tags, LoadAction::Add).unwrap_err();

        assert_matches!(err, LoadError::Parse { .. });
    }

    #[test]
    fn unreadable_source_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");

        let err = prepare(&missing, EntityKind::Series, LoadAction::Add).unwrap_err();

        assert_matches!(err, LoadError::Read { .. });
    }

    #[test]
    fn empty_batch_is_allowed() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "none.json", r#"{"data": []}"#);

        let plan = prepare(&source, EntityKind::Series, LoadAction::Add).unwrap();

        assert!(plan.is_empty());
    }
}
