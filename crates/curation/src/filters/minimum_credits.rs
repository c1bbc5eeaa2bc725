//! Rejects actors with a thin filmography.

use crate::traits::Filter;
use catalog::{ActorCandidate, LanguageCode};

/// Keeps actors with at least `min_credits` movie credits.
///
/// TV credits are never counted; `total_movie_credits` is the size of the
/// movie filmography only.
pub struct MinimumCreditsFilter {
    min_credits: usize,
}

impl MinimumCreditsFilter {
    /// # Arguments
    /// * `min_credits` - Smallest acceptable filmography (typically 15)
    pub fn new(min_credits: usize) -> Self {
        Self { min_credits }
    }
}

impl Filter for MinimumCreditsFilter {
    fn name(&self) -> &str {
        "MinimumCreditsFilter"
    }

    fn passes(&self, candidate: &ActorCandidate, _recent_languages: &[LanguageCode]) -> bool {
        candidate.total_movie_credits >= self.min_credits
    }
}
