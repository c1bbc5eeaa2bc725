//! Filter on the language of an actor's most recent movies.

use super::meets_english_share;
use crate::traits::Filter;
use catalog::{ActorCandidate, LanguageCode};

/// Keeps actors whose recent credits are mostly English-language.
///
/// ## Algorithm
/// 1. Take the first `sample_size` languages (the list is newest first)
/// 2. Pass if english / sampled >= min_english_pct / 100
/// 3. An empty sample passes
pub struct RecentLanguageFilter {
    sample_size: usize,
    min_english_pct: u32,
}

impl RecentLanguageFilter {
    /// # Arguments
    /// * `sample_size` - How many recent credits to look at (typically 20)
    /// * `min_english_pct` - Required English share in percent (typically 70)
    pub fn new(sample_size: usize, min_english_pct: u32) -> Self {
        Self {
            sample_size,
            min_english_pct,
        }
    }
}

impl Filter for RecentLanguageFilter {
    fn name(&self) -> &str {
        "RecentLanguageFilter"
    }

    fn passes(&self, _candidate: &ActorCandidate, recent_languages: &[LanguageCode]) -> bool {
        let sample = &recent_languages[..recent_languages.len().min(self.sample_size)];
        let english = sample.iter().filter(|lang| lang.is_english()).count();
        meets_english_share(english, sample.len(), self.min_english_pct)
    }
}
