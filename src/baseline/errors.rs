use thiserror::Error;

use super::popularity::GroupBy;

pub type BaselineResult<T> = Result<T, BaselineError>;

/// Failures surfaced by the baseline recommenders and feature lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BaselineError {
    /// The URI is not present in the track table
    #[error("Unknown track: {0}")]
    UnknownTrack(String),

    /// The feature name does not match any track column
    #[error("Unknown track feature: '{0}'")]
    UnknownFeature(String),

    /// Artist and album strategies need at least one seed track to draw groups from
    #[error("Cannot recommend by {0} without seed tracks")]
    EmptySeed(GroupBy),

    /// The draw cap was hit before enough eligible tracks were found
    #[error("Gave up after {draws} draws with {found} of {requested} tracks selected")]
    DrawLimitReached {
        requested: usize,
        found: usize,
        draws: usize,
    },

    /// The whole catalog ran out of tracks outside the seed
    #[error("Only {found} eligible tracks in the catalog, {requested} requested")]
    CandidatesExhausted { requested: usize, found: usize },
}
