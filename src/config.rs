use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;

use crate::baseline::RecommenderSettings;

/// Default number of slot columns per playlist row
pub const DEFAULT_TRACKS_PER_PLAYLIST: usize = 15;

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub tracks_per_playlist: usize,
    pub recommender: RecommenderSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("spotify_million_playlist_dataset/data"),
            output_dir: PathBuf::from("data"),
            tracks_per_playlist: DEFAULT_TRACKS_PER_PLAYLIST,
            recommender: RecommenderSettings::default(),
        }
    }
}

/// Load configuration from `.env` and environment. Every variable is
/// optional and falls back to `Config::default()`.
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    config_from_lookup(|key| std::env::var(key).ok())
}

pub(crate) fn config_from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();

    if let Some(dir) = lookup("MPD_INPUT_DIR") {
        config.input_dir = PathBuf::from(dir);
    }
    if let Some(dir) = lookup("MPD_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }
    if let Some(width) = lookup("TRACKS_PER_PLAYLIST") {
        config.tracks_per_playlist = width
            .trim()
            .parse()
            .ok()
            .filter(|&n: &usize| n > 0)
            .ok_or_else(|| anyhow!("TRACKS_PER_PLAYLIST must be a positive integer, got '{width}'"))?;
    }
    if let Some(cap) = lookup("BASELINE_MAX_DRAWS") {
        config.recommender.max_draws = RecommenderSettings::parse_max_draws(&cap)
            .with_context(|| {
                format!("BASELINE_MAX_DRAWS must be an integer or 'unlimited', got '{cap}'")
            })?;
    }
    if let Some(seed) = lookup("BASELINE_SEED") {
        config.recommender.seed = Some(
            seed.trim()
                .parse()
                .with_context(|| format!("BASELINE_SEED must be an integer, got '{seed}'"))?,
        );
    }

    Ok(config)
}
