//! Parameterized list queries.
//!
//! Every list endpoint (articles, projects, series) runs through
//! [`ListQuery::build`], parameterized by a [`ListShape`] describing the
//! parent table and its joins. The generated statement has the form:
//!
//! ```text
//! SELECT <shape columns>
//! FROM (
//!     SELECT * FROM <table>
//!     WHERE <filters> AND <keyset condition>
//!     ORDER BY <parent order>
//!     LIMIT .. [OFFSET ..]
//! ) AS <table>
//! <shape joins>
//! ORDER BY <parent order>, <child order>
//! ```
//!
//! The limit is applied to parents inside the sub-select, so one-to-many
//! joins never truncate a page. Values are always bound, never inlined.

use misite_core::pagination::Pagination;
use misite_core::search_query::SearchFilter;
use misite_core::types::{DbId, Timestamp};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// How a parent table reaches its tags.
#[derive(Debug, Clone, Copy)]
pub struct TagLink {
    /// Junction table, e.g. `article_tags`.
    pub table: &'static str,
    /// Column on the junction table referencing the parent.
    pub parent_fk: &'static str,
}

/// Static description of one listable entity.
#[derive(Debug, Clone, Copy)]
pub struct ListShape {
    /// Parent table. The sub-select is aliased back to this name.
    pub table: &'static str,
    /// Outer column list, qualified by table.
    pub select: &'static str,
    /// Outer `LEFT JOIN` clauses, or empty.
    pub joins: &'static str,
    /// Extra outer `ORDER BY` terms after the parent keys, or empty.
    pub child_order: &'static str,
    /// Timestamp column keyset pagination runs on.
    pub cursor_column: &'static str,
    pub tags: Option<TagLink>,
    /// Column referencing `series.id`, when the entity belongs to a serie.
    pub serie_fk: Option<&'static str>,
    /// Column a `title:` search matches against.
    pub title_column: Option<&'static str>,
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Optional constraints on a list. An empty filter matches everything.
///
/// Filters a shape cannot express (tags on series, for instance) are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Parent must carry every one of these tags.
    pub tag_ids: Vec<DbId>,
    /// Parent must belong to one of these series.
    pub serie_ids: Vec<DbId>,
    /// Like `tag_ids`, matched on lowercase tag name.
    pub tag_names: Vec<String>,
    /// Like `serie_ids`, matched on lowercase serie name.
    pub serie_names: Vec<String>,
    /// Case-insensitive substring of the title column.
    pub title: Option<String>,
}

impl ListFilter {
    pub fn from_search(search: SearchFilter) -> Self {
        Self {
            tag_names: search.tags,
            serie_names: search.series,
            title: search.title,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Drop non-positive ids and blank names, lowercase names, and remove
    /// duplicates. Duplicates would break the tag cardinality check.
    pub fn normalized(&self) -> Self {
        Self {
            tag_ids: unique_ids(&self.tag_ids),
            serie_ids: unique_ids(&self.serie_ids),
            tag_names: unique_names(&self.tag_names),
            serie_names: unique_names(&self.serie_names),
            title: self
                .title
                .as_deref()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty()),
        }
    }
}

fn unique_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut out: Vec<DbId> = Vec::with_capacity(ids.len());
    for &id in ids {
        if id > 0 && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

fn unique_names(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim().to_lowercase();
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically built queries.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    BigInt(i64),
    BigIntArray(Vec<i64>),
    Text(String),
    TextArray(Vec<String>),
    Timestamp(Timestamp),
}

/// Collects bind values and hands out their `$n` placeholders.
#[derive(Debug, Default)]
struct Binder {
    args: Vec<SqlArg>,
}

impl Binder {
    fn push(&mut self, arg: SqlArg) -> String {
        self.args.push(arg);
        format!("${}", self.args.len())
    }
}

/// Bind a slice of [`SqlArg`] to a sqlx `QueryAs`, in order.
pub fn bind_args<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    args: &'q [SqlArg],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for arg in args {
        q = match arg {
            SqlArg::BigInt(v) => q.bind(*v),
            SqlArg::BigIntArray(v) => q.bind(v.as_slice()),
            SqlArg::Text(v) => q.bind(v.as_str()),
            SqlArg::TextArray(v) => q.bind(v.as_slice()),
            SqlArg::Timestamp(v) => q.bind(*v),
        };
    }
    q
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A generated statement and its positional arguments.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub sql: String,
    pub args: Vec<SqlArg>,
}

impl ListQuery {
    pub fn build(shape: &ListShape, filter: &ListFilter, pagination: &Pagination) -> Self {
        let filter = filter.normalized();
        let t = shape.table;
        let mut binder = Binder::default();
        let mut conditions: Vec<String> = Vec::new();

        if let Some(link) = shape.tags {
            let (jt, fk) = (link.table, link.parent_fk);
            if !filter.tag_ids.is_empty() {
                let p = binder.push(SqlArg::BigIntArray(filter.tag_ids.clone()));
                conditions.push(format!(
                    "{t}.id IN (\
                     SELECT {jt}.{fk} FROM {jt} \
                     WHERE {jt}.tag_id = ANY({p}) \
                     GROUP BY {jt}.{fk} \
                     HAVING COUNT(DISTINCT {jt}.tag_id) = CARDINALITY({p}::BIGINT[]))"
                ));
            }
            if !filter.tag_names.is_empty() {
                let p = binder.push(SqlArg::TextArray(filter.tag_names.clone()));
                conditions.push(format!(
                    "{t}.id IN (\
                     SELECT {jt}.{fk} FROM {jt} \
                     JOIN tags ON tags.id = {jt}.tag_id \
                     WHERE LOWER(tags.name) = ANY({p}) \
                     GROUP BY {jt}.{fk} \
                     HAVING COUNT(DISTINCT LOWER(tags.name)) = CARDINALITY({p}::TEXT[]))"
                ));
            }
        }

        if let Some(fk) = shape.serie_fk {
            if !filter.serie_ids.is_empty() {
                let p = binder.push(SqlArg::BigIntArray(filter.serie_ids.clone()));
                conditions.push(format!("{t}.{fk} = ANY({p})"));
            }
            if !filter.serie_names.is_empty() {
                let p = binder.push(SqlArg::TextArray(filter.serie_names.clone()));
                conditions.push(format!(
                    "EXISTS (\
                     SELECT 1 FROM series \
                     WHERE series.id = {t}.{fk} AND LOWER(series.name) = ANY({p}))"
                ));
            }
        }

        if let (Some(col), Some(title)) = (shape.title_column, filter.title.as_deref()) {
            let p = binder.push(SqlArg::Text(format!("%{}%", escape_like(title))));
            conditions.push(format!("LOWER({t}.{col}) LIKE {p}"));
        }

        let (order, page_clause) = match *pagination {
            Pagination::Keyset { after, limit } => {
                let cc = shape.cursor_column;
                if let Some(cursor) = after {
                    let at = binder.push(SqlArg::Timestamp(cursor.at));
                    let id = binder.push(SqlArg::BigInt(cursor.id));
                    conditions.push(format!(
                        "({t}.{cc} < {at} OR ({t}.{cc} = {at} AND {t}.id > {id}))"
                    ));
                }
                let l = binder.push(SqlArg::BigInt(limit));
                (format!("{t}.{cc} DESC, {t}.id ASC"), format!("LIMIT {l}"))
            }
            Pagination::Offset { limit, .. } => {
                let l = binder.push(SqlArg::BigInt(limit));
                let o = binder.push(SqlArg::BigInt(pagination.row_offset()));
                (format!("{t}.id ASC"), format!("LIMIT {l} OFFSET {o}"))
            }
        };

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let joins = if shape.joins.is_empty() {
            String::new()
        } else {
            format!(" {}", shape.joins)
        };
        let child_order = if shape.child_order.is_empty() {
            String::new()
        } else {
            format!(", {}", shape.child_order)
        };

        let sql = format!(
            "SELECT {select} FROM (\
             SELECT * FROM {t}{where_clause} ORDER BY {order} {page_clause}\
             ) AS {t}{joins} ORDER BY {order}{child_order}",
            select = shape.select,
        );

        Self {
            sql,
            args: binder.args,
        }
    }

    /// Prepare the statement for row type `O` with all arguments bound.
    pub fn query_as<O>(&self) -> QueryAs<'_, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        bind_args(sqlx::query_as::<_, O>(&self.sql), &self.args)
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
