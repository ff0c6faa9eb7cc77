//! Merging of per-source search results.
//!
//! Each source reports dates in its own format, so results are ordered by the
//! parsed timestamp rather than by comparing raw strings. Hits whose date does
//! not parse go last, ordered by their raw date string.

use crate::models::ArticleSummary;
use crate::utils::parse_timestamp;
use itertools::Itertools;
use std::cmp::Reverse;

/// Concatenate per-source hits, newest first, keeping at most `limit`.
pub fn merge_results<I>(batches: I, limit: usize) -> Vec<ArticleSummary>
where
    I: IntoIterator<Item = Vec<ArticleSummary>>,
{
    batches
        .into_iter()
        .flatten()
        .sorted_by_cached_key(|summary| Reverse((parse_timestamp(&summary.date), summary.date.clone())))
        .take(limit)
        .collect()
}
