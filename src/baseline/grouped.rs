use rand::Rng;
use rand::seq::SliceRandom;

use super::errors::{BaselineError, BaselineResult};
use super::popularity::{CatalogSnapshot, GroupBy};
use super::sampling::{SeedSet, draw_until_filled};
use super::settings::{AlbumExhaustion, RecommenderSettings};

/// Recommend `count` tracks that share an artist or album with the seed.
///
/// Each draw picks one group key from the seed (one entry per seed track, so
/// keys shared by several seed tracks are drawn more often) and tries to take
/// one track from that group:
///
/// * `popularity = true` walks the group from its most popular track and
///   takes the first one outside the seed and the selection.
/// * `popularity = false` tries the group's tracks in random order.
///
/// A draw that yields nothing is simply retried with a fresh key, bounded by
/// `settings.max_draws`.
pub fn recommend_by_group<R>(
    snapshot: &CatalogSnapshot,
    group_by: GroupBy,
    seed: &SeedSet,
    count: usize,
    popularity: bool,
    settings: &RecommenderSettings,
    rng: &mut R,
) -> BaselineResult<Vec<String>>
where
    R: Rng + ?Sized,
{
    if count == 0 {
        return Ok(Vec::new());
    }
    if seed.is_empty() {
        return Err(BaselineError::EmptySeed(group_by));
    }

    let keys = seed_group_keys(snapshot, group_by, seed)?;
    log::debug!(
        "Recommending {count} tracks by {group_by} from {} seed tracks (popularity: {popularity})",
        seed.len()
    );

    draw_until_filled(count, settings.max_draws, |selection| {
        let key = keys.choose(&mut *rng)?;
        let group = snapshot.group(group_by, key);

        if popularity {
            // Artists with a single known track would only ever offer that track
            if group_by == GroupBy::Artist && group.len() == 1 {
                return None;
            }

            let mut last_selected = None;
            for track in &group {
                let uri = track.uri.as_str();
                if selection.contains(uri) {
                    last_selected = Some(uri);
                } else if !seed.contains(uri) {
                    return Some(uri.to_string());
                }
            }

            // Exhausted album: repeat the last already selected track it holds
            if group_by == GroupBy::Album && settings.album_exhaustion == AlbumExhaustion::DuplicateLast {
                let uri = last_selected?;
                log::debug!("Album {key} exhausted, repeating {uri}");
                return Some(uri.to_string());
            }
            None
        } else {
            if group.len() <= 1 {
                return None;
            }
            let mut candidates = group;
            candidates.shuffle(&mut *rng);
            candidates
                .into_iter()
                .map(|track| track.uri.as_str())
                .find(|uri| !seed.contains(uri) && !selection.contains(uri))
                .map(str::to_string)
        }
    })
}

/// Group key of every seed track, in seed order
fn seed_group_keys<'a>(
    snapshot: &'a CatalogSnapshot,
    group_by: GroupBy,
    seed: &SeedSet,
) -> BaselineResult<Vec<&'a str>> {
    seed.iter()
        .map(|uri| {
            snapshot
                .track(uri)
                .map(|track| group_by.key(track))
                .ok_or_else(|| BaselineError::UnknownTrack(uri.to_string()))
        })
        .collect()
}
