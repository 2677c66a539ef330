use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod baseline;
mod catalog;
mod config;
mod ingest;
mod models;


use crate::baseline::{
    BaselineRecommender, RecommendationRequest, RecommenderSettings, SamplingMode, Strategy, TrackFeature,
};
use crate::catalog::{CsvTableSource, TableSource};
use crate::config::load_config;
use crate::ingest::{OutputLayout, process_mpd_data};

#[derive(Parser)]
#[command(name = "mpd-baselines")]
#[command(about = "Million Playlist Dataset ingestion and baseline recommenders")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert MPD JSON slices into playlist and track CSV files
    Ingest {
        /// Directory holding the raw `*.json` slices
        #[arg(short = 'i', long = "input")]
        input_dir: Option<PathBuf>,

        /// Output root; files go to `<output>/playlists` and `<output>/tracks`
        #[arg(short = 'o', long = "output")]
        output_dir: Option<PathBuf>,

        /// Number of track slot columns per playlist row
        #[arg(short = 'n', long = "tracks-per-playlist", value_parser = clap::value_parser!(u32).range(1..))]
        tracks_per_playlist: Option<u32>,

        /// Delete previously written CSV files before parsing
        #[arg(long = "clean")]
        clean: bool,
    },

    /// Recommend tracks for a playlist or a list of seed tracks
    Recommend {
        /// Data root written by `ingest`
        #[arg(short = 'd', long = "data")]
        data_dir: Option<PathBuf>,

        #[arg(short = 's', long = "strategy", value_enum)]
        strategy: Strategy,

        #[arg(short = 'm', long = "mode", value_enum, default_value_t = SamplingMode::Popularity)]
        mode: SamplingMode,

        /// Number of tracks to recommend
        #[arg(short = 'n', long = "count", default_value_t = 5)]
        count: usize,

        /// Use the populated slots of this playlist as the seed
        #[arg(short = 'p', long = "playlist", conflicts_with = "tracks", required_unless_present = "tracks")]
        playlist: Option<u64>,

        /// Seed track URIs
        #[arg(short = 't', long = "track", num_args = 1..)]
        tracks: Vec<String>,

        /// Fixed RNG seed for reproducible output
        #[arg(long = "seed")]
        seed: Option<u64>,

        /// Cap on group draws, or "unlimited"
        #[arg(long = "max-draws")]
        max_draws: Option<String>,
    },

    /// Print one feature (or all features) of a track
    Feature {
        #[arg(short = 'd', long = "data")]
        data_dir: Option<PathBuf>,

        /// Track URI to look up
        uri: String,

        /// Feature name such as `artist_name`; all features when omitted
        feature: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config()?;

    match args.command {
        Command::Ingest {
            input_dir,
            output_dir,
            tracks_per_playlist,
            clean,
        } => run_ingest(
            input_dir.unwrap_or_else(|| config.input_dir.clone()),
            output_dir.unwrap_or_else(|| config.output_dir.clone()),
            tracks_per_playlist.map_or(config.tracks_per_playlist, |n| n as usize),
            clean,
        ),
        Command::Recommend {
            data_dir,
            strategy,
            mode,
            count,
            playlist,
            tracks,
            seed,
            max_draws,
        } => {
            let mut settings = config.recommender.clone();
            if seed.is_some() {
                settings.seed = seed;
            }
            if let Some(cap) = max_draws {
                settings.max_draws = RecommenderSettings::parse_max_draws(&cap)
                    .with_context(|| format!("Invalid --max-draws value '{cap}'"))?;
            }
            let source = CsvTableSource::new(data_dir.unwrap_or_else(|| config.output_dir.clone()));
            run_recommend(&source, settings, strategy, mode, count, playlist, tracks)
        }
        Command::Feature { data_dir, uri, feature } => {
            let source = CsvTableSource::new(data_dir.unwrap_or_else(|| config.output_dir.clone()));
            run_feature(&source, config.recommender.clone(), &uri, feature.as_deref())
        }
    }
}

fn run_ingest(
    input_dir: PathBuf,
    output_dir: PathBuf,
    tracks_per_playlist: usize,
    clean: bool,
) -> Result<()> {
    println!("Input directory: {}", input_dir.display());
    println!("Output directory: {}", output_dir.display());
    println!("Track slots per playlist: {tracks_per_playlist}");

    let layout = OutputLayout::new(&output_dir);
    if clean {
        let removed = layout.clear()?;
        println!("Deleted {removed} files from previous runs");
    }

    let report = process_mpd_data(&input_dir, &layout, tracks_per_playlist)
        .with_context(|| format!("Failed to ingest {}", input_dir.display()))?;

    println!("\n=== INGESTION SUMMARY ===");
    let playlist_rows: usize = report.written.iter().map(|s| s.playlist_rows).sum();
    let track_rows: usize = report.written.iter().map(|s| s.track_rows).sum();
    println!(
        "Converted {} slices: {playlist_rows} playlists, {track_rows} track rows",
        report.written.len()
    );
    for (path, e) in &report.failed {
        println!("✗ {}: {e}", path.display());
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("{} slices failed to convert", report.failed.len()))
    }
}

fn run_recommend(
    source: &dyn TableSource,
    settings: RecommenderSettings,
    strategy: Strategy,
    mode: SamplingMode,
    count: usize,
    playlist: Option<u64>,
    tracks: Vec<String>,
) -> Result<()> {
    let tracks_table = source.load_tracks().context("Failed to load track table")?;
    let playlists = source.load_playlists().context("Failed to load playlist table")?;

    let seed = match playlist {
        Some(pid) => {
            let row = playlists
                .get(pid)
                .with_context(|| format!("Playlist {pid} not found"))?;
            println!("Seed playlist {pid}: {}", row.name);
            if let Some(modified) = row.modified_at_utc() {
                println!("Last modified: {}", modified.format("%Y-%m-%d"));
            }
            row.track_uris().map(str::to_string).collect()
        }
        None => tracks,
    };

    let mut recommender = BaselineRecommender::from_tables(&tracks_table, &playlists, settings);
    let request = RecommendationRequest {
        seed,
        count,
        strategy,
        mode,
    };
    let picks = recommender
        .recommend(&request)
        .with_context(|| format!("{strategy:?} recommendation failed"))?;

    println!("\n=== RECOMMENDATIONS ({strategy:?}, {mode:?}) ===");
    for (i, uri) in picks.iter().enumerate() {
        let name = recommender.feature(uri, TrackFeature::TrackName)?;
        let artist = recommender.feature(uri, TrackFeature::ArtistName)?;
        let popularity = recommender.snapshot().popularity(uri).unwrap_or(0);
        println!(
            "{:>3}. \"{}\" by {} ({popularity}x) | {uri}",
            i + 1,
            name.as_text().unwrap_or("Unknown"),
            artist.as_text().unwrap_or("Unknown")
        );
    }
    Ok(())
}

fn run_feature(
    source: &dyn TableSource,
    settings: RecommenderSettings,
    uri: &str,
    feature: Option<&str>,
) -> Result<()> {
    let recommender = BaselineRecommender::from_source(source, settings)?;
    match feature {
        Some(name) => {
            println!("{}", recommender.track_feature(uri, name)?);
        }
        None => {
            for feature in TrackFeature::ALL {
                println!("{feature}: {}", recommender.feature(uri, feature)?);
            }
        }
    }
    Ok(())
}
