use std::fmt;
use std::str::FromStr;

use super::errors::BaselineError;
use crate::models::Track;

/// Named track columns available for lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackFeature {
    TrackName,
    AlbumName,
    AlbumUri,
    ArtistName,
    ArtistUri,
    DurationMs,
    Popularity,
}

impl TrackFeature {
    pub const ALL: [TrackFeature; 7] = [
        TrackFeature::TrackName,
        TrackFeature::AlbumName,
        TrackFeature::AlbumUri,
        TrackFeature::ArtistName,
        TrackFeature::ArtistUri,
        TrackFeature::DurationMs,
        TrackFeature::Popularity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackFeature::TrackName => "track_name",
            TrackFeature::AlbumName => "album_name",
            TrackFeature::AlbumUri => "album_uri",
            TrackFeature::ArtistName => "artist_name",
            TrackFeature::ArtistUri => "artist_uri",
            TrackFeature::DurationMs => "duration_ms",
            TrackFeature::Popularity => "popularity",
        }
    }

    pub fn read(&self, track: &Track) -> FeatureValue {
        match self {
            TrackFeature::TrackName => FeatureValue::Text(track.name.clone()),
            TrackFeature::AlbumName => FeatureValue::Text(track.album_name.clone()),
            TrackFeature::AlbumUri => FeatureValue::Text(track.album_uri.clone()),
            TrackFeature::ArtistName => FeatureValue::Text(track.artist_name.clone()),
            TrackFeature::ArtistUri => FeatureValue::Text(track.artist_uri.clone()),
            TrackFeature::DurationMs => FeatureValue::Integer(track.duration_ms),
            TrackFeature::Popularity => FeatureValue::Integer(track.popularity as u64),
        }
    }
}

impl FromStr for TrackFeature {
    type Err = BaselineError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        TrackFeature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == name)
            .ok_or_else(|| BaselineError::UnknownFeature(name.to_string()))
    }
}

impl fmt::Display for TrackFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar value of a single track feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureValue {
    Text(String),
    Integer(u64),
}

impl FeatureValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(text) => Some(text),
            FeatureValue::Integer(_) => None,
        }
    }

    #[cfg(test)]
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            FeatureValue::Integer(value) => Some(*value),
            FeatureValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Text(text) => f.write_str(text),
            FeatureValue::Integer(value) => write!(f, "{value}"),
        }
    }
}
