use anyhow::{Context, Result, anyhow, bail};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::tables::{PlaylistTable, TrackTable};
use crate::models::{PlaylistRow, SLOT_SENTINEL, TrackRow, TrackSlot, slot_columns};

/// Hands the recommender its two tables
#[cfg_attr(test, mockall::automock)]
pub trait TableSource {
    fn load_tracks(&self) -> Result<TrackTable>;
    fn load_playlists(&self) -> Result<PlaylistTable>;
}

/// Reads the CSV slices written by ingestion from `<root>/playlists` and
/// `<root>/tracks`
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    playlist_dir: PathBuf,
    track_dir: PathBuf,
}

impl CsvTableSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            playlist_dir: root.join("playlists"),
            track_dir: root.join("tracks"),
        }
    }
}

impl TableSource for CsvTableSource {
    fn load_tracks(&self) -> Result<TrackTable> {
        let mut rows = Vec::new();
        for path in csv_files(&self.track_dir)? {
            let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
            rows.extend(read_track_csv(file).with_context(|| format!("Bad track file {}", path.display()))?);
        }
        let table = TrackTable::from_rows(rows);
        log::info!("Loaded {} distinct tracks from {}", table.len(), self.track_dir.display());
        Ok(table)
    }

    fn load_playlists(&self) -> Result<PlaylistTable> {
        let mut rows = Vec::new();
        for path in csv_files(&self.playlist_dir)? {
            let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
            rows.extend(
                read_playlist_csv(file).with_context(|| format!("Bad playlist file {}", path.display()))?,
            );
        }
        let table = PlaylistTable::from_rows(rows)?;
        log::info!(
            "Loaded {} playlists with {} track slots each ({} padded) from {}",
            table.len(),
            table.slot_width(),
            table.sentinel_count(),
            self.playlist_dir.display()
        );
        Ok(table)
    }
}

/// `*.csv` files directly inside `dir`, sorted by name
pub fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn read_track_csv<R: Read>(reader: R) -> Result<Vec<TrackRow>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Parse a playlist file. The slot width is taken from the header: slots are
/// read for k = 1, 2, ... while a `track_k_uri` column exists.
pub fn read_playlist_csv<R: Read>(reader: R) -> Result<Vec<PlaylistRow>> {
    let mut reader = csv::Reader::from_reader(reader);
    let positions: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), i))
        .collect();

    let column = |name: &str| -> Result<usize> {
        positions
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("Missing column '{name}'"))
    };

    let fixed = PlaylistRow::FIXED_COLUMNS
        .iter()
        .map(|&name| column(name))
        .collect::<Result<Vec<_>>>()?;

    let mut slot_positions = Vec::new();
    for k in 1.. {
        let [track, album, artist] = slot_columns(k);
        if !positions.contains_key(&track) {
            break;
        }
        slot_positions.push([column(&track)?, column(&album)?, column(&artist)?]);
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or_default();

        let slots = slot_positions
            .iter()
            .map(|&[track, album, artist]| {
                let uri = field(track);
                (uri != SLOT_SENTINEL && !uri.is_empty()).then(|| TrackSlot {
                    track_uri: uri.to_string(),
                    album_uri: field(album).to_string(),
                    artist_uri: field(artist).to_string(),
                })
            })
            .collect();

        let collaborative = match field(fixed[10]).trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            other => bail!("Row {}: invalid collaborative value '{other}'", line + 1),
        };

        rows.push(PlaylistRow {
            pid: parse_number(field(fixed[0]), "pid", line)?,
            name: field(fixed[1]).to_string(),
            description: field(fixed[2]).to_string(),
            modified_at: parse_number(field(fixed[3]), "modified_at", line)?,
            num_artists: parse_number(field(fixed[4]), "num_artists", line)?,
            num_albums: parse_number(field(fixed[5]), "num_albums", line)?,
            num_tracks: parse_number(field(fixed[6]), "num_tracks", line)?,
            num_followers: parse_number(field(fixed[7]), "num_followers", line)?,
            num_edits: parse_number(field(fixed[8]), "num_edits", line)?,
            duration_ms: parse_number(field(fixed[9]), "duration_ms", line)?,
            collaborative,
            slots,
        });
    }
    Ok(rows)
}

/// Parse one numeric column as its field's type. Negative or out-of-range
/// values are errors.
fn parse_number<T>(value: &str, name: &str, line: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| {
            format!(
                "Row {}: '{name}' is not a valid {}: '{value}'",
                line + 1,
                std::any::type_name::<T>()
            )
        })
}
