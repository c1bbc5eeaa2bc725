//! Filter on the language of the titles an actor is known for.
//!
//! Only movie entries of the known-for list are counted; TV entries are
//! ignored entirely, in the numerator and the denominator.

use super::meets_english_share;
use crate::traits::Filter;
use catalog::{ActorCandidate, LanguageCode, MediaType};

/// Keeps actors whose known-for movies are mostly English-language.
///
/// ## Algorithm
/// 1. Keep the known-for entries whose media type is Movie
/// 2. Count those with original language "en"
/// 3. Pass if english / movies >= min_english_pct / 100
/// 4. A list without any movie entries passes
pub struct KnownForLanguageFilter {
    min_english_pct: u32,
}

impl KnownForLanguageFilter {
    /// # Arguments
    /// * `min_english_pct` - Required English share in percent (typically 50)
    pub fn new(min_english_pct: u32) -> Self {
        Self { min_english_pct }
    }
}

impl Filter for KnownForLanguageFilter {
    fn name(&self) -> &str {
        "KnownForLanguageFilter"
    }

    fn passes(&self, candidate: &ActorCandidate, _recent_languages: &[LanguageCode]) -> bool {
        let (movies, english) = candidate
            .known_for
            .iter()
            .filter(|entry| entry.media_type == MediaType::Movie)
            .fold((0, 0), |(movies, english), entry| {
                (movies + 1, english + entry.original_language.is_english() as usize)
            });

        meets_english_share(english, movies, self.min_english_pct)
    }
}
