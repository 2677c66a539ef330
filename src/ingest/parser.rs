use std::path::Path;

use super::errors::{IngestError, IngestResult};
use crate::models::{MpdPlaylist, MpdSlice, PlaylistRow, TrackRow, TrackSlot};

/// Rows produced from one slice
#[derive(Debug, Default)]
pub struct FlattenedSlice {
    pub playlists: Vec<PlaylistRow>,
    pub tracks: Vec<TrackRow>,
}

pub fn parse_slice(json: &str) -> serde_json::Result<MpdSlice> {
    serde_json::from_str(json)
}

pub fn read_slice(path: &Path) -> IngestResult<MpdSlice> {
    let content = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_slice(&content).map_err(|source| IngestError::MalformedSlice {
        path: path.to_path_buf(),
        source,
    })
}

/// Flatten every playlist of a slice. Rows keep the slice's order and
/// duplicates are not removed.
pub fn flatten_slice(slice: &MpdSlice, tracks_per_playlist: usize) -> FlattenedSlice {
    let mut flattened = FlattenedSlice::default();
    for playlist in &slice.playlists {
        let (row, tracks) = flatten_playlist(playlist, tracks_per_playlist);
        flattened.playlists.push(row);
        flattened.tracks.extend(tracks);
    }
    flattened
}

/// The first `tracks_per_playlist` tracks fill the row's slots, the rest of
/// the slots are padded. Every track, including those past the slot width,
/// gets a track row.
pub fn flatten_playlist(playlist: &MpdPlaylist, tracks_per_playlist: usize) -> (PlaylistRow, Vec<TrackRow>) {
    let mut slots: Vec<Option<TrackSlot>> = playlist
        .tracks
        .iter()
        .take(tracks_per_playlist)
        .map(|track| {
            Some(TrackSlot {
                track_uri: track.track_uri.clone(),
                album_uri: track.album_uri.clone(),
                artist_uri: track.artist_uri.clone(),
            })
        })
        .collect();
    slots.resize(tracks_per_playlist, None);

    let tracks = playlist
        .tracks
        .iter()
        .map(|track| TrackRow {
            pid: playlist.pid,
            track_name: track.track_name.clone(),
            track_uri: track.track_uri.clone(),
            album_name: track.album_name.clone(),
            album_uri: track.album_uri.clone(),
            artist_name: track.artist_name.clone(),
            artist_uri: track.artist_uri.clone(),
            duration_ms: track.duration_ms,
            pos: track.pos,
        })
        .collect();

    let row = PlaylistRow {
        pid: playlist.pid,
        name: playlist.name.clone(),
        description: playlist.description.clone(),
        modified_at: playlist.modified_at,
        num_artists: playlist.num_artists,
        num_albums: playlist.num_albums,
        num_tracks: playlist.num_tracks,
        num_followers: playlist.num_followers,
        num_edits: playlist.num_edits,
        duration_ms: playlist.duration_ms,
        collaborative: playlist.collaborative,
        slots,
    };

    (row, tracks)
}
