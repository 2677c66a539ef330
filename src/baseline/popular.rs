use super::errors::{BaselineError, BaselineResult};
use super::popularity::CatalogSnapshot;
use super::sampling::SeedSet;

/// The `count` most popular tracks outside the seed, in rank order.
/// Deterministic for a given snapshot and seed.
pub fn recommend_most_popular(
    snapshot: &CatalogSnapshot,
    seed: &SeedSet,
    count: usize,
) -> BaselineResult<Vec<String>> {
    let picks: Vec<String> = snapshot
        .ranked()
        .filter(|track| !seed.contains(&track.uri))
        .take(count)
        .map(|track| track.uri.clone())
        .collect();

    if picks.len() < count {
        return Err(BaselineError::CandidatesExhausted {
            requested: count,
            found: picks.len(),
        });
    }
    Ok(picks)
}
