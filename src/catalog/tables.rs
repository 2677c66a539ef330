use std::collections::HashMap;
use std::collections::hash_map::Entry;
use thiserror::Error;

use crate::models::{PlaylistRow, Track, TrackRow};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Duplicate playlist id {0}")]
    DuplicatePid(u64),

    #[error("Playlist {pid} has {found} track slots, table expects {expected}")]
    SlotWidthMismatch {
        pid: u64,
        expected: usize,
        found: usize,
    },
}

/// Distinct tracks keyed by URI, kept in load order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackTable {
    tracks: Vec<Track>,
    index: HashMap<String, usize>,
}

impl TrackTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from per-occurrence rows. The first row seen for a URI wins.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = TrackRow>,
    {
        let mut table = Self::new();
        for row in rows {
            table.insert(Track::from(row));
        }
        table
    }

    /// Insert a track unless its URI is already present. Returns whether it was added.
    pub fn insert(&mut self, track: Track) -> bool {
        match self.index.entry(track.uri.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(self.tracks.len());
                self.tracks.push(track);
                true
            }
        }
    }

    pub fn get(&self, uri: &str) -> Option<&Track> {
        self.index.get(uri).map(|&i| &self.tracks[i])
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub(crate) fn as_slice(&self) -> &[Track] {
        &self.tracks
    }

    /// Copy of this table with every track's popularity replaced by `popularity(uri)`
    pub fn with_popularity<F>(&self, popularity: F) -> Self
    where
        F: Fn(&str) -> u32,
    {
        let tracks = self
            .tracks
            .iter()
            .map(|track| Track {
                popularity: popularity(&track.uri),
                ..track.clone()
            })
            .collect();

        Self {
            tracks,
            index: self.index.clone(),
        }
    }
}

/// Flattened playlists keyed by `pid`. Every row has the same slot width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistTable {
    rows: Vec<PlaylistRow>,
    index: HashMap<u64, usize>,
    slot_width: usize,
}

impl PlaylistTable {
    pub fn new(slot_width: usize) -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
            slot_width,
        }
    }

    /// Build a table whose width is taken from the first row
    pub fn from_rows<I>(rows: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = PlaylistRow>,
    {
        let mut rows = rows.into_iter().peekable();
        let width = rows.peek().map_or(0, |row| row.slots.len());
        let mut table = Self::new(width);
        for row in rows {
            table.insert(row)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, row: PlaylistRow) -> Result<(), TableError> {
        if row.slots.len() != self.slot_width {
            return Err(TableError::SlotWidthMismatch {
                pid: row.pid,
                expected: self.slot_width,
                found: row.slots.len(),
            });
        }
        match self.index.entry(row.pid) {
            Entry::Occupied(_) => Err(TableError::DuplicatePid(row.pid)),
            Entry::Vacant(slot) => {
                slot.insert(self.rows.len());
                self.rows.push(row);
                Ok(())
            }
        }
    }

    pub fn get(&self, pid: u64) -> Option<&PlaylistRow> {
        self.index.get(&pid).map(|&i| &self.rows[i])
    }

    pub fn slot_width(&self) -> usize {
        self.slot_width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaylistRow> {
        self.rows.iter()
    }

    /// Number of padded slots across all rows
    pub fn sentinel_count(&self) -> usize {
        self.rows.iter().map(PlaylistRow::padded_slot_count).sum()
    }
}
