use anyhow::Context;
use clap::ValueEnum;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::errors::{BaselineError, BaselineResult};
use super::features::{FeatureValue, TrackFeature};
use super::grouped::recommend_by_group;
use super::popular::recommend_most_popular;
use super::popularity::{CatalogSnapshot, GroupBy};
use super::sampling::SeedSet;
use super::settings::RecommenderSettings;
use crate::catalog::{PlaylistTable, TableSource, TrackTable};

/// Which tracks count as candidates for a seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Tracks by the seed's artists
    Artist,
    /// Tracks from the seed's albums
    Album,
    /// The catalog's most popular tracks
    #[value(alias = "popular")]
    MostPopular,
}

/// How a candidate is chosen within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SamplingMode {
    /// Most popular eligible track first
    #[default]
    Popularity,
    /// Uniformly random eligible track
    Random,
}

/// A single "recommend N tracks" query
#[derive(Debug, Clone)]
pub struct RecommendationRequest {
    pub seed: Vec<String>,
    pub count: usize,
    pub strategy: Strategy,
    pub mode: SamplingMode,
}

/// Non-learned recommenders over one catalog snapshot
pub struct BaselineRecommender {
    snapshot: CatalogSnapshot,
    settings: RecommenderSettings,
    rng: StdRng,
}

impl BaselineRecommender {
    pub fn new(snapshot: CatalogSnapshot, settings: RecommenderSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            snapshot,
            settings,
            rng,
        }
    }

    /// Compute popularity from `playlists` and build a recommender over it
    pub fn from_tables(
        tracks: &TrackTable,
        playlists: &PlaylistTable,
        settings: RecommenderSettings,
    ) -> Self {
        let snapshot = CatalogSnapshot::compute(tracks, playlists);
        log::info!(
            "Catalog snapshot: {} tracks, {} playlists, {} slot appearances of {} distinct tracks",
            snapshot.tracks().len(),
            playlists.len(),
            snapshot.counts().total(),
            snapshot.counts().len()
        );
        if snapshot.counts().is_empty() {
            log::warn!("No populated playlist slots, every track has popularity 0");
        }
        Self::new(snapshot, settings)
    }

    pub fn from_source(
        source: &dyn TableSource,
        settings: RecommenderSettings,
    ) -> anyhow::Result<Self> {
        let tracks = source.load_tracks().context("Failed to load track table")?;
        if tracks.is_empty() {
            log::warn!("Track table is empty");
        }
        let playlists = source
            .load_playlists()
            .context("Failed to load playlist table")?;
        Ok(Self::from_tables(&tracks, &playlists, settings))
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    /// Replace the snapshot with one computed from `playlists`. The
    /// previous snapshot is returned unchanged.
    pub fn refresh(&mut self, playlists: &PlaylistTable) -> CatalogSnapshot {
        let next = CatalogSnapshot::compute(self.snapshot.tracks(), playlists);
        std::mem::replace(&mut self.snapshot, next)
    }

    pub fn recommend(&mut self, request: &RecommendationRequest) -> BaselineResult<Vec<String>> {
        let popularity = request.mode == SamplingMode::Popularity;
        match request.strategy {
            Strategy::Artist => self.recommend_by_artists(&request.seed, request.count, popularity),
            Strategy::Album => self.recommend_by_albums(&request.seed, request.count, popularity),
            Strategy::MostPopular => self.recommend_popular(&request.seed, request.count),
        }
    }

    pub fn recommend_by_artists(
        &mut self,
        seed: &[String],
        count: usize,
        popularity: bool,
    ) -> BaselineResult<Vec<String>> {
        self.recommend_grouped(GroupBy::Artist, seed, count, popularity)
    }

    pub fn recommend_by_albums(
        &mut self,
        seed: &[String],
        count: usize,
        popularity: bool,
    ) -> BaselineResult<Vec<String>> {
        self.recommend_grouped(GroupBy::Album, seed, count, popularity)
    }

    pub fn recommend_popular(&self, seed: &[String], count: usize) -> BaselineResult<Vec<String>> {
        recommend_most_popular(&self.snapshot, &SeedSet::new(seed.iter().cloned()), count)
    }

    /// Look up a feature by its column name, e.g. `"artist_name"`
    pub fn track_feature(&self, uri: &str, feature: &str) -> BaselineResult<FeatureValue> {
        self.feature(uri, feature.parse()?)
    }

    pub fn feature(&self, uri: &str, feature: TrackFeature) -> BaselineResult<FeatureValue> {
        self.snapshot
            .track(uri)
            .map(|track| feature.read(track))
            .ok_or_else(|| BaselineError::UnknownTrack(uri.to_string()))
    }

    fn recommend_grouped(
        &mut self,
        group_by: GroupBy,
        seed: &[String],
        count: usize,
        popularity: bool,
    ) -> BaselineResult<Vec<String>> {
        recommend_by_group(
            &self.snapshot,
            group_by,
            &SeedSet::new(seed.iter().cloned()),
            count,
            popularity,
            &self.settings,
            &mut self.rng,
        )
    }
}
