/// Upper bound on group draws for a single artist/album request
pub const DEFAULT_MAX_DRAWS: usize = 10_000;

/// What popularity-mode album recommendations do when the popularity walk
/// reaches an album's last remaining track and that track is already selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlbumExhaustion {
    /// Append the track again so the request keeps making progress
    #[default]
    DuplicateLast,
    /// Treat the album as exhausted and draw another one
    Redraw,
}

/// Tuning for the sampling loops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommenderSettings {
    /// `None` lets the draw loop run until the request is filled
    pub max_draws: Option<usize>,
    pub album_exhaustion: AlbumExhaustion,
    /// Fixed RNG seed for reproducible recommendations
    pub seed: Option<u64>,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            max_draws: Some(DEFAULT_MAX_DRAWS),
            album_exhaustion: AlbumExhaustion::default(),
            seed: None,
        }
    }
}

impl RecommenderSettings {
    /// Parse a draw cap from text. "unlimited" and "none" disable the cap.
    pub fn parse_max_draws(value: &str) -> Result<Option<usize>, std::num::ParseIntError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unlimited" | "none" => Ok(None),
            other => other.parse().map(Some),
        }
    }
}
