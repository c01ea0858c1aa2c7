//! Shared query parameter parsing for list handlers.
//!
//! List endpoints take repeated `tagId`/`serieId` keys, which the
//! `serde_urlencoded` struct deserializer cannot collect. Handlers extract the
//! raw pairs with `Query<Vec<(String, String)>>` and hand them to
//! [`ListParams::parse`].

use misite_core::error::CoreError;
use misite_core::pagination::{parse_i64, Cursor, Pagination};
use misite_core::search_query::tokenize;
use misite_core::types::DbId;
use misite_db::query_builder::ListFilter;

use crate::error::AppError;

/// Raw query pairs in request order.
pub type QueryPairs = Vec<(String, String)>;

/// Typed view of a list request's query string.
///
/// Unknown keys are ignored. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Keyset cursor of the last row already seen.
    pub last: Option<Cursor>,
    pub tag_ids: Vec<DbId>,
    pub serie_ids: Vec<DbId>,
    pub search: Option<String>,
    /// Entity scope for tag endpoints.
    pub by: Option<String>,
}

impl ListParams {
    pub fn parse(pairs: &[(String, String)]) -> Result<Self, CoreError> {
        let mut params = Self::default();

        for (key, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "page" => params.page = Some(parse_i64("page", value)?),
                "limit" => params.limit = Some(parse_i64("limit", value)?),
                "last" => params.last = Some(Cursor::decode(value)?),
                "tagId" => params.tag_ids.push(parse_i64("tagId", value)?),
                "serieId" => params.serie_ids.push(parse_i64("serieId", value)?),
                "search" => params.search = Some(value.to_string()),
                "by" => params.by = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(params)
    }

    /// Combined id and search constraints, normalized.
    pub fn filter(&self) -> ListFilter {
        let mut filter = self
            .search
            .as_deref()
            .map(|q| ListFilter::from_search(tokenize(q)))
            .unwrap_or_default();
        filter.tag_ids.clone_from(&self.tag_ids);
        filter.serie_ids.clone_from(&self.serie_ids);
        filter.normalized()
    }

    pub fn offset(&self) -> Pagination {
        Pagination::offset(self.page, self.limit)
    }

    pub fn keyset(&self) -> Pagination {
        Pagination::keyset(self.last, self.limit)
    }

    /// Keyset when the caller sent a cursor, offset otherwise.
    pub fn pagination(&self) -> Pagination {
        if self.last.is_some() {
            self.keyset()
        } else {
            self.offset()
        }
    }
}

/// Parse an id path segment. Anything that is not a positive integer cannot
/// name a row, so it is reported as not found rather than malformed.
pub fn parse_path_id(entity: &str, raw: &str) -> Result<DbId, AppError> {
    match raw.trim().parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::NotFound(format!("{entity} with id {raw} not found"))),
    }
}
