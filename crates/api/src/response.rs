//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use misite_core::pagination::{next_cursor, KeysetItem};
use misite_core::ranking::{most_frequent_tags, Tagged, RELATED_TAGS_LIMIT};
use misite_core::types::DbId;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One page of a list endpoint.
#[derive(Debug, Serialize)]
pub struct ListPage<T: Serialize> {
    pub items: Vec<T>,
    /// Cursor for the following page. Absent on the final page and in
    /// offset mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Ids of the tags used most across `items`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_tags: Vec<DbId>,
}

impl<T: Serialize> ListPage<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            next: None,
            related_tags: Vec::new(),
        }
    }

    /// Attach the cursor of the page after this one, if the page was full.
    pub fn with_next(mut self, limit: i64) -> Self
    where
        T: KeysetItem,
    {
        self.next = next_cursor(&self.items, limit);
        self
    }

    pub fn with_related_tags(mut self) -> Self
    where
        T: Tagged,
    {
        self.related_tags = most_frequent_tags(&self.items, RELATED_TAGS_LIMIT);
        self
    }
}
