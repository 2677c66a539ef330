use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{IngestError, IngestResult};
use super::parser::{flatten_slice, read_slice};
use super::writer::{create_file, write_playlists, write_tracks};

/// Where the per-slice CSV files go
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub playlist_dir: PathBuf,
    pub track_dir: PathBuf,
}

impl OutputLayout {
    /// `<root>/playlists` and `<root>/tracks`
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            playlist_dir: root.join("playlists"),
            track_dir: root.join("tracks"),
        }
    }

    pub fn playlist_path(&self, suffix: &str) -> PathBuf {
        self.playlist_dir.join(format!("mpd_playlists_{suffix}.csv"))
    }

    pub fn track_path(&self, suffix: &str) -> PathBuf {
        self.track_dir.join(format!("mpd_tracks_{suffix}.csv"))
    }

    pub fn ensure_dirs(&self) -> IngestResult<()> {
        for dir in [&self.playlist_dir, &self.track_dir] {
            fs::create_dir_all(dir).map_err(|source| IngestError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Remove the files left by earlier runs. Returns how many were deleted.
    pub fn clear(&self) -> IngestResult<usize> {
        let mut removed = 0;
        for dir in [&self.playlist_dir, &self.track_dir] {
            if !dir.exists() {
                continue;
            }
            let io_err = |source| IngestError::Io {
                path: dir.clone(),
                source,
            };
            for entry in fs::read_dir(dir).map_err(io_err)? {
                let path = entry.map_err(io_err)?.path();
                if path.is_file() {
                    fs::remove_file(&path).map_err(|source| IngestError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    removed += 1;
                }
            }
            log::info!("Cleared {}", dir.display());
        }
        Ok(removed)
    }
}

/// Files written for one slice
#[derive(Debug, Clone)]
pub struct SliceOutput {
    pub suffix: String,
    pub playlist_path: PathBuf,
    pub track_path: PathBuf,
    pub playlist_rows: usize,
    pub track_rows: usize,
}

/// Outcome of a whole ingestion run
#[derive(Debug, Default)]
pub struct IngestReport {
    pub written: Vec<SliceOutput>,
    pub failed: Vec<(PathBuf, IngestError)>,
}

impl IngestReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Second-to-last dot-separated part of the file name:
/// `mpd.slice.0-999.json` gives `0-999`
pub fn slice_suffix(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() < 2 {
        return None;
    }
    Some(parts[parts.len() - 2].to_string()).filter(|suffix| !suffix.is_empty())
}

/// `*.json` files in `dir`, sorted by name
pub fn list_slices(dir: &Path) -> IngestResult<Vec<PathBuf>> {
    let io_err = |source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut slices = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            slices.push(path);
        }
    }
    slices.sort();
    Ok(slices)
}

/// Convert one slice file into its playlist and track CSV files. Nothing is
/// written unless both tables have rows.
pub fn process_slice(path: &Path, layout: &OutputLayout, tracks_per_playlist: usize) -> IngestResult<SliceOutput> {
    let suffix = slice_suffix(path).ok_or_else(|| IngestError::UnnamedSlice(path.to_path_buf()))?;
    let slice = read_slice(path)?;
    let flattened = flatten_slice(&slice, tracks_per_playlist);

    let playlist_path = layout.playlist_path(&suffix);
    let track_path = layout.track_path(&suffix);

    if flattened.playlists.is_empty() {
        return Err(IngestError::EmptyTable(playlist_path.display().to_string()));
    }
    if flattened.tracks.is_empty() {
        return Err(IngestError::EmptyTable(track_path.display().to_string()));
    }

    write_playlists(
        create_file(&playlist_path)?,
        &flattened.playlists,
        &playlist_path.display().to_string(),
    )?;
    log::info!("{} saved", playlist_path.display());

    let tracks_written = create_file(&track_path)
        .and_then(|file| write_tracks(file, &flattened.tracks, &track_path.display().to_string()));
    if let Err(e) = tracks_written {
        // A slice is written as a pair or not at all
        remove_partial(&playlist_path);
        remove_partial(&track_path);
        return Err(e);
    }
    log::info!("{} saved", track_path.display());

    Ok(SliceOutput {
        suffix,
        playlist_path,
        track_path,
        playlist_rows: flattened.playlists.len(),
        track_rows: flattened.tracks.len(),
    })
}

fn remove_partial(path: &Path) {
    if path.is_file() {
        match fs::remove_file(path) {
            Ok(()) => log::warn!("Removed partial output {}", path.display()),
            Err(e) => log::error!("Failed to remove partial output {}: {e}", path.display()),
        }
    }
}

/// Convert every slice in `input_dir`. A failing slice is recorded in the
/// report and the remaining slices still run.
pub fn process_mpd_data(
    input_dir: &Path,
    layout: &OutputLayout,
    tracks_per_playlist: usize,
) -> IngestResult<IngestReport> {
    layout.ensure_dirs()?;
    let slices = list_slices(input_dir)?;
    log::info!("Parsing {} slices from {}", slices.len(), input_dir.display());

    let mut report = IngestReport::default();
    for (i, path) in slices.iter().enumerate() {
        log::info!("Slice {} of {}: {}", i + 1, slices.len(), path.display());
        match process_slice(path, layout, tracks_per_playlist) {
            Ok(output) => report.written.push(output),
            Err(e) => {
                log::error!("Skipping {}: {e}", path.display());
                report.failed.push((path.clone(), e));
            }
        }
    }
    Ok(report)
}
