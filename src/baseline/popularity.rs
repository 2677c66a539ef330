use std::collections::HashMap;
use std::fmt;

use crate::catalog::{PlaylistTable, TrackTable};
use crate::models::Track;

/// Appearance counts of every track URI found in playlist slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopularityCounts {
    counts: HashMap<String, u32>,
}

impl PopularityCounts {
    /// Count track URIs over every populated slot. Album and artist URIs in
    /// the same slot are ignored, padded slots are skipped.
    pub fn from_playlists(playlists: &PlaylistTable) -> Self {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for playlist in playlists.iter() {
            for uri in playlist.track_uris() {
                *counts.entry(uri.to_string()).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    /// Zero for URIs never seen in a slot
    pub fn get(&self, uri: &str) -> u32 {
        self.counts.get(uri).copied().unwrap_or(0)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.iter().map(|(_, count)| count as u64).sum()
    }

    /// Number of distinct URIs counted
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(uri, &count)| (uri.as_str(), count))
    }
}

/// Track column used to group candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupBy {
    Artist,
    Album,
}

impl GroupBy {
    pub fn key<'a>(&self, track: &'a Track) -> &'a str {
        match self {
            GroupBy::Artist => &track.artist_uri,
            GroupBy::Album => &track.album_uri,
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupBy::Artist => write!(f, "artist"),
            GroupBy::Album => write!(f, "album"),
        }
    }
}

/// A track table with popularity computed from one playlist table, plus the
/// rank and group indexes the recommenders walk. Recomputing popularity
/// builds a new snapshot; an existing one never changes.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    tracks: TrackTable,
    counts: PopularityCounts,
    /// Track positions by descending popularity, ties in load order
    ranked: Vec<usize>,
    by_artist: HashMap<String, Vec<usize>>,
    by_album: HashMap<String, Vec<usize>>,
}

impl CatalogSnapshot {
    pub fn compute(tracks: &TrackTable, playlists: &PlaylistTable) -> Self {
        Self::from_counts(tracks, PopularityCounts::from_playlists(playlists))
    }

    /// Left-join `counts` onto `tracks`
    pub fn from_counts(tracks: &TrackTable, counts: PopularityCounts) -> Self {
        let tracks = tracks.with_popularity(|uri| counts.get(uri));
        let slice = tracks.as_slice();

        let mut ranked: Vec<usize> = (0..slice.len()).collect();
        // Stable sort keeps load order among equal popularity
        ranked.sort_by(|&a, &b| slice[b].popularity.cmp(&slice[a].popularity));

        let mut by_artist: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_album: HashMap<String, Vec<usize>> = HashMap::new();
        for &i in &ranked {
            let track = &slice[i];
            by_artist.entry(track.artist_uri.clone()).or_default().push(i);
            by_album.entry(track.album_uri.clone()).or_default().push(i);
        }

        Self {
            tracks,
            counts,
            ranked,
            by_artist,
            by_album,
        }
    }

    pub fn tracks(&self) -> &TrackTable {
        &self.tracks
    }

    pub fn counts(&self) -> &PopularityCounts {
        &self.counts
    }

    pub fn track(&self, uri: &str) -> Option<&Track> {
        self.tracks.get(uri)
    }

    pub fn popularity(&self, uri: &str) -> Option<u32> {
        self.track(uri).map(|track| track.popularity)
    }

    /// Every track, most popular first
    pub fn ranked(&self) -> impl Iterator<Item = &Track> {
        let slice = self.tracks.as_slice();
        self.ranked.iter().map(move |&i| &slice[i])
    }

    /// Tracks sharing `key` under `group_by`, most popular first.
    /// Empty for unknown keys.
    pub fn group(&self, group_by: GroupBy, key: &str) -> Vec<&Track> {
        let index = match group_by {
            GroupBy::Artist => &self.by_artist,
            GroupBy::Album => &self.by_album,
        };
        let slice = self.tracks.as_slice();
        index
            .get(key)
            .map(|positions| positions.iter().map(|&i| &slice[i]).collect())
            .unwrap_or_default()
    }
}
