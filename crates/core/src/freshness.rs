//! "New" and "recently updated" badges on list items.

use chrono::Duration;
use serde::Serialize;

use crate::types::Timestamp;

/// An entity counts as new for this many days after creation.
pub const NEW_FOR_DAYS: i64 = 5;

/// An edit is shown as recent for this many days.
pub const UPDATED_FOR_DAYS: i64 = 3;

pub fn is_new(created_at: Timestamp, now: Timestamp) -> bool {
    now.signed_duration_since(created_at) < Duration::days(NEW_FOR_DAYS)
}

/// True when the entity was edited after creation, within the last few days.
pub fn recently_updated(created_at: Timestamp, updated_at: Timestamp, now: Timestamp) -> bool {
    updated_at != created_at
        && now.signed_duration_since(updated_at) < Duration::days(UPDATED_FOR_DAYS)
}

/// Both badges, flattened into serialized list items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Freshness {
    pub is_new: bool,
    pub recently_updated: bool,
}

impl Freshness {
    pub fn at(created_at: Timestamp, updated_at: Timestamp, now: Timestamp) -> Self {
        Self {
            is_new: is_new(created_at, now),
            recently_updated: recently_updated(created_at, updated_at, now),
        }
    }

    pub fn now(created_at: Timestamp, updated_at: Timestamp) -> Self {
        Self::at(created_at, updated_at, chrono::Utc::now())
    }
}
