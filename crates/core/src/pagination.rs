//! Pagination primitives shared by every list endpoint.
//!
//! Two strategies are supported:
//!
//! - **Offset**: `page`/`limit`, ordered by id. Cheap and simple, but rows can
//!   be skipped or repeated if the underlying set changes between fetches.
//! - **Keyset**: an opaque cursor `"<unixNanos>-<id>"` naming the last row of
//!   the previous page. Results are ordered by `(timestamp DESC, id ASC)` and
//!   the next page starts strictly after the cursor pair.

use chrono::DateTime;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Page size used when the caller gives none (or an invalid one).
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on any page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided page size. Values below 1 fall back to the default.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(l) if l >= 1 => l.min(MAX_PAGE_SIZE),
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// Clamp a user-provided 1-indexed page number. Values below 1 become 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Parse a decimal integer parameter, naming the parameter on failure.
pub fn parse_i64(param: &str, raw: &str) -> Result<i64, CoreError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| CoreError::parse(param, raw))
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Position of the last row seen by a keyset-paginated client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Ordering timestamp of the last row (`updated_at` or `created_at`).
    pub at: Timestamp,
    /// Id of the last row, the tiebreaker for equal timestamps.
    pub id: DbId,
}

impl Cursor {
    pub fn new(at: Timestamp, id: DbId) -> Self {
        Self { at, id }
    }

    /// Decode `"<unixNanos>-<id>"`.
    ///
    /// The split happens on the last `-` so timestamps before the epoch
    /// (negative nanos) still decode.
    pub fn decode(raw: &str) -> Result<Self, CoreError> {
        let (nanos, id) = raw
            .trim()
            .rsplit_once('-')
            .ok_or_else(|| CoreError::parse("last", raw))?;
        let nanos: i64 = nanos.parse().map_err(|_| CoreError::parse("last", raw))?;
        let id: DbId = id.parse().map_err(|_| CoreError::parse("last", raw))?;
        Ok(Self {
            at: DateTime::from_timestamp_nanos(nanos),
            id,
        })
    }

    /// Encode as `"<unixNanos>-<id>"`.
    ///
    /// Timestamps beyond the nanosecond range (year 2262) saturate.
    pub fn encode(&self) -> String {
        let nanos = self.at.timestamp_nanos_opt().unwrap_or(i64::MAX);
        format!("{nanos}-{}", self.id)
    }
}

/// An item that can be used as a keyset pagination anchor.
pub trait KeysetItem {
    fn cursor(&self) -> Cursor;
}

/// Cursor for the page after `items`, or `None` when `items` was a short
/// (therefore final) page.
pub fn next_cursor<T: KeysetItem>(items: &[T], limit: i64) -> Option<String> {
    if items.is_empty() || (items.len() as i64) < limit {
        return None;
    }
    items.last().map(|item| item.cursor().encode())
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Pagination strategy for a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// 1-indexed page ordered by id ascending.
    Offset { page: i64, limit: i64 },
    /// Rows strictly after `after` (or from the top when `None`).
    Keyset { after: Option<Cursor>, limit: i64 },
}

impl Pagination {
    /// Offset pagination with clamped inputs.
    pub fn offset(page: Option<i64>, limit: Option<i64>) -> Self {
        Pagination::Offset {
            page: clamp_page(page),
            limit: clamp_limit(limit),
        }
    }

    /// Keyset pagination with a clamped limit.
    pub fn keyset(after: Option<Cursor>, limit: Option<i64>) -> Self {
        Pagination::Keyset {
            after,
            limit: clamp_limit(limit),
        }
    }

    pub fn limit(&self) -> i64 {
        match self {
            Pagination::Offset { limit, .. } | Pagination::Keyset { limit, .. } => *limit,
        }
    }

    /// Row offset for offset pagination; always 0 for keyset.
    pub fn row_offset(&self) -> i64 {
        match self {
            Pagination::Offset { page, limit } => (page - 1).saturating_mul(*limit),
            Pagination::Keyset { .. } => 0,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::offset(None, None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    // -- clamping ------------------------------------------------------------

    #[test]
    fn clamp_limit_defaults_when_missing_or_below_one() {
        assert_eq!(clamp_limit(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(0)), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(-3)), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn clamp_limit_caps_at_max() {
        assert_eq!(clamp_limit(Some(5_000)), MAX_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(25)), 25);
    }

    #[test]
    fn clamp_page_floors_at_one() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(-4)), 1);
        assert_eq!(clamp_page(Some(3)), 3);
    }

    #[test]
    fn parse_i64_rejects_non_numeric() {
        assert_eq!(parse_i64("page", "7").unwrap(), 7);
        assert_matches!(parse_i64("page", "seven"), Err(CoreError::Parse(_)));
    }

    // -- offsets -------------------------------------------------------------

    #[test]
    fn offset_pagination_computes_row_offset() {
        let p = Pagination::offset(Some(3), Some(10));
        assert_eq!(p.limit(), 10);
        assert_eq!(p.row_offset(), 20);
    }

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(Pagination::default().row_offset(), 0);
        assert_eq!(Pagination::default().limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn keyset_pagination_has_no_row_offset() {
        let p = Pagination::keyset(None, Some(0));
        assert_eq!(p.row_offset(), 0);
        assert_eq!(p.limit(), DEFAULT_PAGE_SIZE);
    }

    // -- cursor --------------------------------------------------------------

    #[test]
    fn cursor_round_trips_through_its_string_form() {
        let at = chrono::Utc
            .with_ymd_and_hms(2024, 5, 17, 8, 30, 0)
            .unwrap();
        let cursor = Cursor::new(at, 42);
        let encoded = cursor.encode();
        assert_eq!(encoded, format!("{}-42", at.timestamp_nanos_opt().unwrap()));
        assert_eq!(Cursor::decode(&encoded).unwrap(), cursor);
    }

    #[test]
    fn cursor_decodes_pre_epoch_timestamps() {
        let cursor = Cursor::decode("-1000-3").unwrap();
        assert_eq!(cursor.id, 3);
        assert_eq!(cursor.at.timestamp_nanos_opt(), Some(-1000));
    }

    #[test]
    fn malformed_cursor_is_a_parse_error() {
        assert_matches!(Cursor::decode("garbage"), Err(CoreError::Parse(_)));
        assert_matches!(Cursor::decode("12-x"), Err(CoreError::Parse(_)));
        assert_matches!(Cursor::decode("x-12"), Err(CoreError::Parse(_)));
    }

    struct Item(Cursor);

    impl KeysetItem for Item {
        fn cursor(&self) -> Cursor {
            self.0
        }
    }

    #[test]
    fn next_cursor_only_for_full_pages() {
        let at = DateTime::from_timestamp_nanos(1_000);
        let items = vec![Item(Cursor::new(at, 1)), Item(Cursor::new(at, 2))];

        assert_eq!(next_cursor(&items, 2), Some("1000-2".to_string()));
        assert_eq!(next_cursor(&items, 3), None);
        assert_eq!(next_cursor::<Item>(&[], 2), None);
    }
}
