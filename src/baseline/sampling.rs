use std::collections::HashSet;

use super::errors::{BaselineError, BaselineResult};

/// Seed tracks of a request. Membership checks go through the set, the
/// list keeps the caller's order.
#[derive(Debug, Clone, Default)]
pub struct SeedSet {
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl SeedSet {
    pub fn new<I, S>(uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seed = Self::default();
        for uri in uris {
            let uri = uri.into();
            seed.members.insert(uri.clone());
            seed.ordered.push(uri);
        }
        seed
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.members.contains(uri)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }
}

/// Tracks picked so far, in pick order. Duplicates are kept in the order.
#[derive(Debug, Default)]
pub struct Selection {
    picks: Vec<String>,
    members: HashSet<String>,
}

impl Selection {
    pub fn contains(&self, uri: &str) -> bool {
        self.members.contains(uri)
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    fn push(&mut self, uri: String) {
        self.members.insert(uri.clone());
        self.picks.push(uri);
    }

    pub fn into_vec(self) -> Vec<String> {
        self.picks
    }
}

/// Call `draw` until `count` tracks are selected. Each call is one draw;
/// `None` means the draw produced nothing and another is made.
/// With `max_draws` set, running out of draws is an error.
pub fn draw_until_filled<F>(count: usize, max_draws: Option<usize>, mut draw: F) -> BaselineResult<Vec<String>>
where
    F: FnMut(&Selection) -> Option<String>,
{
    let mut selection = Selection::default();
    let mut draws = 0usize;

    while selection.len() < count {
        if max_draws.is_some_and(|cap| draws >= cap) {
            log::warn!(
                "Draw limit reached: {}/{} tracks after {} draws",
                selection.len(),
                count,
                draws
            );
            return Err(BaselineError::DrawLimitReached {
                requested: count,
                found: selection.len(),
                draws,
            });
        }
        draws += 1;

        if let Some(uri) = draw(&selection) {
            selection.push(uri);
        }
    }

    log::debug!("Filled {count} picks in {draws} draws");
    Ok(selection.into_vec())
}
