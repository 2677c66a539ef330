use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One MPD slice file. The `info` block is not needed and is ignored.
#[derive(Debug, Deserialize)]
pub struct MpdSlice {
    pub playlists: Vec<MpdPlaylist>,
}

/// Playlist record as it appears in the raw slice JSON
#[derive(Debug, Clone, Deserialize)]
pub struct MpdPlaylist {
    pub pid: u64,
    pub name: String,
    #[serde(default)]
    pub description: String, // Optional in the dataset
    pub modified_at: i64,
    pub num_artists: u32,
    pub num_albums: u32,
    pub num_tracks: u32,
    pub num_followers: u32,
    pub num_edits: u32,
    pub duration_ms: u64,
    #[serde(deserialize_with = "bool_or_string")]
    pub collaborative: bool,
    pub tracks: Vec<MpdTrack>,
}

/// Track entry nested inside a raw playlist record
#[derive(Debug, Clone, Deserialize)]
pub struct MpdTrack {
    pub track_name: String,
    pub track_uri: String,
    pub album_name: String,
    pub album_uri: String,
    pub artist_name: String,
    pub artist_uri: String,
    pub duration_ms: u64,
    pub pos: u32,
}

/// The published dataset stores `collaborative` as "true"/"false" strings,
/// hand-built fixtures tend to use real booleans.
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid collaborative flag: {other}"
            ))),
        },
    }
}

/// A positional track reference stored in a playlist row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSlot {
    pub track_uri: String,
    pub album_uri: String,
    pub artist_uri: String,
}

/// Written in place of every component of an empty slot
pub const SLOT_SENTINEL: &str = "0";

/// Column names of the 1-based slot `k`: track, album and artist URI
pub fn slot_columns(k: usize) -> [String; 3] {
    [
        format!("track_{k}_uri"),
        format!("track_{k}_album_uri"),
        format!("track_{k}_artist_uri"),
    ]
}

/// Flattened playlist: one row per playlist with a fixed number of slots.
/// `None` marks a padded slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistRow {
    pub pid: u64,
    pub name: String,
    pub description: String,
    pub modified_at: i64,
    pub num_artists: u32,
    pub num_albums: u32,
    pub num_tracks: u32,
    pub num_followers: u32,
    pub num_edits: u32,
    pub duration_ms: u64,
    pub collaborative: bool,
    pub slots: Vec<Option<TrackSlot>>,
}

impl PlaylistRow {
    /// Names of the fixed (non-slot) columns, in output order
    pub const FIXED_COLUMNS: [&'static str; 11] = [
        "pid",
        "name",
        "description",
        "modified_at",
        "num_artists",
        "num_albums",
        "num_tracks",
        "num_followers",
        "num_edits",
        "duration_ms",
        "collaborative",
    ];

    pub fn modified_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.modified_at, 0)
    }

    /// Track URIs of the populated slots, in slot order
    pub fn track_uris(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .flatten()
            .map(|slot| slot.track_uri.as_str())
    }

    pub fn padded_slot_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }
}

/// One row per track occurrence, `pid` links back to the playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRow {
    pub pid: u64,
    pub track_name: String,
    pub track_uri: String,
    pub album_name: String,
    pub album_uri: String,
    pub artist_name: String,
    pub artist_uri: String,
    pub duration_ms: u64,
    pub pos: u32,
}

/// Catalog entry for a distinct track. `popularity` is zero until a
/// snapshot computes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub uri: String,
    pub name: String,
    pub album_uri: String,
    pub album_name: String,
    pub artist_uri: String,
    pub artist_name: String,
    pub duration_ms: u64,
    pub popularity: u32,
}

impl From<TrackRow> for Track {
    fn from(row: TrackRow) -> Self {
        Track {
            uri: row.track_uri,
            name: row.track_name,
            album_uri: row.album_uri,
            album_name: row.album_name,
            artist_uri: row.artist_uri,
            artist_name: row.artist_name,
            duration_ms: row.duration_ms,
            ..Self::default()
        }
    }
}

impl Default for Track {
    fn default() -> Self {
        Track {
            uri: String::new(),
            name: "Unknown".to_string(),
            album_uri: String::new(),
            album_name: "Unknown".to_string(),
            artist_uri: String::new(),
            artist_name: "Unknown".to_string(),
            duration_ms: 0,
            popularity: 0,
        }
    }
}
