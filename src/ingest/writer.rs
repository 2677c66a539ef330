use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::errors::{IngestError, IngestResult};
use crate::models::{PlaylistRow, SLOT_SENTINEL, TrackRow, slot_columns};

/// Header of a playlist file with `tracks_per_playlist` slot column groups
pub fn playlist_header(tracks_per_playlist: usize) -> Vec<String> {
    let mut header: Vec<String> = PlaylistRow::FIXED_COLUMNS
        .iter()
        .map(|name| name.to_string())
        .collect();
    for k in 1..=tracks_per_playlist {
        header.extend(slot_columns(k));
    }
    header
}

fn playlist_record(row: &PlaylistRow) -> Vec<String> {
    let mut record = vec![
        row.pid.to_string(),
        row.name.clone(),
        row.description.clone(),
        row.modified_at.to_string(),
        row.num_artists.to_string(),
        row.num_albums.to_string(),
        row.num_tracks.to_string(),
        row.num_followers.to_string(),
        row.num_edits.to_string(),
        row.duration_ms.to_string(),
        row.collaborative.to_string(),
    ];
    for slot in &row.slots {
        match slot {
            Some(slot) => record.extend([
                slot.track_uri.clone(),
                slot.album_uri.clone(),
                slot.artist_uri.clone(),
            ]),
            None => record.extend((0..3).map(|_| SLOT_SENTINEL.to_string())),
        }
    }
    record
}

/// Write playlist rows as CSV. The slot width comes from the first row.
pub fn write_playlists<W: Write>(out: W, rows: &[PlaylistRow], label: &str) -> IngestResult<()> {
    let first = rows
        .first()
        .ok_or_else(|| IngestError::EmptyTable(label.to_string()))?;

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(playlist_header(first.slots.len()))?;
    for row in rows {
        writer.write_record(playlist_record(row))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_tracks<W: Write>(out: W, rows: &[TrackRow], label: &str) -> IngestResult<()> {
    if rows.is_empty() {
        return Err(IngestError::EmptyTable(label.to_string()));
    }

    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub(crate) fn create_file(path: &Path) -> IngestResult<File> {
    File::create(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}
