//! Report row ordering: artist name ascending, engagement score descending,
//! then `created_at` descending.

use std::cmp::Ordering;

use crate::models::{CreatedAt, EngagementRow};

/// Total order over report rows, matching the report query's `ORDER BY`.
///
/// Artist names compare byte-wise (SQLite's default `BINARY` collation).
/// `created_at` follows [`CreatedAt::store_cmp`], with NULL lowest, so NULLs
/// come last under the descending key. Rows equal on all three keys compare
/// `Equal`.
#[must_use]
pub fn compare_engagement_rows(left: &EngagementRow, right: &EngagementRow) -> Ordering {
    left.artist_name
        .cmp(&right.artist_name)
        .then_with(|| right.engagement_score.cmp(&left.engagement_score))
        .then_with(|| compare_created_at(right.created_at.as_ref(), left.created_at.as_ref()))
}

/// Stable, so rows tied on every key keep the order the store returned.
pub fn sort_engagement_rows(rows: &mut [EngagementRow]) {
    rows.sort_by(compare_engagement_rows);
}

/// Index of the first row that sorts after its successor.
#[must_use]
pub fn first_ordering_violation(rows: &[EngagementRow]) -> Option<usize> {
    rows.windows(2)
        .position(|pair| compare_engagement_rows(&pair[0], &pair[1]) == Ordering::Greater)
}

fn compare_created_at(left: Option<&CreatedAt>, right: Option<&CreatedAt>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => left.store_cmp(right),
    }
}
