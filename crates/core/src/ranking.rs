//! Tag frequency ranking over a result set.

use std::collections::HashMap;

use crate::types::DbId;

/// Number of related tags shown beside list pages.
pub const RELATED_TAGS_LIMIT: usize = 16;

/// An entity that carries a list of tags.
pub trait Tagged {
    fn tag_ids(&self) -> impl Iterator<Item = DbId> + '_;
}

/// The `limit` tag ids used most often across `items`.
///
/// Sorted by count descending. Ties keep the order in which each tag was
/// first seen.
pub fn most_frequent_tags<T: Tagged>(items: &[T], limit: usize) -> Vec<DbId> {
    let mut counts: HashMap<DbId, usize> = HashMap::new();
    let mut discovered: Vec<DbId> = Vec::new();

    for id in items.iter().flat_map(Tagged::tag_ids) {
        let count = counts.entry(id).or_insert(0);
        if *count == 0 {
            discovered.push(id);
        }
        *count += 1;
    }

    // `sort_by` is stable, so equal counts stay in discovery order.
    discovered.sort_by(|a, b| counts[b].cmp(&counts[a]));
    discovered.truncate(limit);
    discovered
}

/// Split `(tag, count)` pairs into parallel sequences ordered by count
/// descending. Pairs with equal counts keep their input order.
pub fn rank_tag_counts<T>(mut pairs: Vec<(T, i64)>) -> (Vec<T>, Vec<i64>) {
    pairs.sort_by(|a, b| b.1.cmp(&a.1));
    pairs.into_iter().unzip()
}
