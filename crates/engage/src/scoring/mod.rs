//! Engagement weights per event tag.
//!
//! The report query and the in-process comparator both read from
//! [`ENGAGEMENT_SCORES`]; the SQL `CASE` expression is rendered from it rather
//! than written by hand.

use crate::models::EventKind;

/// Score for any tag missing from [`ENGAGEMENT_SCORES`], including NULL.
pub const DEFAULT_ENGAGEMENT_SCORE: i64 = 0;

/// `add_track_to_playlist`/`like_track` and `share_track`/`follow_artist`
/// intentionally share a tier.
pub const ENGAGEMENT_SCORES: &[(EventKind, i64)] = &[
    (EventKind::PlayTrack, 1),
    (EventKind::AddTrackToPlaylist, 2),
    (EventKind::ShareTrack, 3),
    (EventKind::LikeTrack, 2),
    (EventKind::FollowArtist, 3),
    (EventKind::ShareArtist, 4),
];

#[must_use]
pub fn score_for_kind(kind: EventKind) -> i64 {
    ENGAGEMENT_SCORES
        .iter()
        .find_map(|(candidate, score)| (*candidate == kind).then_some(*score))
        .unwrap_or(DEFAULT_ENGAGEMENT_SCORE)
}

/// Exact, case-sensitive match, same as SQL `=` on TEXT.
#[must_use]
pub fn engagement_score(event_type: Option<&str>) -> i64 {
    event_type
        .and_then(EventKind::parse)
        .map_or(DEFAULT_ENGAGEMENT_SCORE, score_for_kind)
}

/// Renders the score table as a SQL `CASE` over `column`.
///
/// `column` is spliced verbatim and must be a trusted column expression.
#[must_use]
pub fn score_case_sql(column: &str) -> String {
    let mut sql = String::from("CASE");
    for (kind, score) in ENGAGEMENT_SCORES {
        sql.push_str(&format!(
            "\n        WHEN {column} = {} THEN {score}",
            sqlite_single_quoted(kind.as_str())
        ));
    }
    sql.push_str(&format!("\n        ELSE {DEFAULT_ENGAGEMENT_SCORE}\n    END"));
    sql
}

fn sqlite_single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_ENGAGEMENT_SCORE, ENGAGEMENT_SCORES, engagement_score, score_case_sql,
        score_for_kind,
    };
    use crate::models::EventKind;
    use rusqlite::Connection;

    #[test]
    fn every_event_kind_has_exactly_one_table_entry() {
        for kind in EventKind::ALL {
            let entries = ENGAGEMENT_SCORES
                .iter()
                .filter(|(candidate, _)| *candidate == kind)
                .count();
            assert_eq!(entries, 1, "{} should appear once", kind.as_str());
        }
    }

    #[test]
    fn tabulated_scores_match_product_weights() {
        assert_eq!(score_for_kind(EventKind::PlayTrack), 1);
        assert_eq!(score_for_kind(EventKind::AddTrackToPlaylist), 2);
        assert_eq!(score_for_kind(EventKind::LikeTrack), 2);
        assert_eq!(score_for_kind(EventKind::ShareTrack), 3);
        assert_eq!(score_for_kind(EventKind::FollowArtist), 3);
        assert_eq!(score_for_kind(EventKind::ShareArtist), 4);
    }

    #[test]
    fn unknown_empty_and_null_tags_score_zero() {
        assert_eq!(engagement_score(None), DEFAULT_ENGAGEMENT_SCORE);
        assert_eq!(engagement_score(Some("")), 0);
        assert_eq!(engagement_score(Some("skip_track")), 0);
        assert_eq!(engagement_score(Some("Share_Artist")), 0);
    }

    #[test]
    fn rendered_case_agrees_with_lookup_when_evaluated_by_sqlite() {
        let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        let query = format!(
            "SELECT {} FROM (SELECT ?1 AS event_type)",
            score_case_sql("event_type")
        );

        let mut inputs: Vec<Option<&str>> = EventKind::ALL
            .iter()
            .map(|kind| Some(kind.as_str()))
            .collect();
        inputs.extend([None, Some(""), Some("unfollow_artist"), Some("PLAY_TRACK")]);

        for input in inputs {
            let from_sql = connection
                .query_row(&query, [input], |row| row.get::<usize, i64>(0))
                .expect("case expression should evaluate");
            assert_eq!(from_sql, engagement_score(input), "mismatch for {input:?}");
        }
    }

    #[test]
    fn rendered_case_ends_with_default_branch() {
        let sql = score_case_sql("e.event_type");
        assert!(sql.starts_with("CASE"));
        assert!(sql.contains("WHEN e.event_type = 'share_artist' THEN 4"));
        assert!(sql.trim_end().ends_with("ELSE 0\n    END"));
    }
}
