use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event tags the product emits into `user_events.event_type`.
///
/// The column itself is free text, so rows read back from the store carry the
/// raw string rather than this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PlayTrack,
    AddTrackToPlaylist,
    LikeTrack,
    ShareTrack,
    FollowArtist,
    ShareArtist,
}

impl EventKind {
    pub const ALL: [Self; 6] = [
        Self::PlayTrack,
        Self::AddTrackToPlaylist,
        Self::LikeTrack,
        Self::ShareTrack,
        Self::FollowArtist,
        Self::ShareArtist,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlayTrack => "play_track",
            Self::AddTrackToPlaylist => "add_track_to_playlist",
            Self::LikeTrack => "like_track",
            Self::ShareTrack => "share_track",
            Self::FollowArtist => "follow_artist",
            Self::ShareArtist => "share_artist",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }

    #[must_use]
    pub fn engagement_score(self) -> i64 {
        crate::scoring::score_for_kind(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct User {
    pub id: i64,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Artist {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UserEvent {
    pub id: i64,
    pub user_id: i64,
    pub artist_id: i64,

    #[serde(default)]
    pub event_type: Option<String>,

    pub created_at: String,
}

/// `created_at` as the store holds it.
///
/// Integer and real values stay numeric so they order the way SQLite orders
/// its storage classes; text is never reinterpreted as an epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CreatedAt {
    Epoch(i64),
    Fractional(f64),
    Text(String),
}

impl CreatedAt {
    /// SQLite sort order of storage classes: numeric values before text.
    fn storage_rank(&self) -> u8 {
        match self {
            Self::Epoch(_) | Self::Fractional(_) => 0,
            Self::Text(_) => 1,
        }
    }

    fn numeric(&self) -> Option<f64> {
        match self {
            Self::Epoch(value) => Some(*value as f64),
            Self::Fractional(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    /// Ascending order as SQLite's `ORDER BY` produces it: numbers compare
    /// numerically, text compares byte-wise, numbers sort before text.
    #[must_use]
    pub fn store_cmp(&self, other: &Self) -> Ordering {
        self.storage_rank()
            .cmp(&other.storage_rank())
            .then_with(|| match (self, other) {
                (Self::Text(left), Self::Text(right)) => left.cmp(right),
                _ => match (self.numeric(), other.numeric()) {
                    (Some(left), Some(right)) => left.total_cmp(&right),
                    _ => Ordering::Equal,
                },
            })
    }
}

impl From<&str> for CreatedAt {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One row of the engagement report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EngagementRow {
    pub artist_name: String,
    pub event_type: Option<String>,
    pub engagement_score: i64,
    pub created_at: Option<CreatedAt>,
    pub timezone: Option<String>,
}

/// Payload handed to the page layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    pub data: Vec<EngagementRow>,
}

/// Seed document accepted by `engage seed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreFixture {
    #[serde(default)]
    pub users: Vec<User>,

    #[serde(default)]
    pub artists: Vec<Artist>,

    #[serde(default)]
    pub events: Vec<UserEvent>,
}

#[must_use]
pub fn json_schema() -> Value {
    let schema = schemars::schema_for!(EngagementRow);
    match serde_json::to_value(schema) {
        Ok(value) => value,
        Err(error) => {
            panic!("failed to serialize generated engagement row schema: {error}");
        }
    }
}
