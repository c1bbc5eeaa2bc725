//! Core traits for the eligibility pipeline.
//!
//! Each eligibility rule is a `Filter`; the `CatalogFilter` chains them.

use catalog::{ActorCandidate, LanguageCode};

/// One rule an actor must pass to be admitted into the catalog.
///
/// `Send + Sync` so rules can be evaluated from rayon worker threads.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether the candidate passes this rule.
    ///
    /// # Arguments
    /// * `candidate` - The actor being screened
    /// * `recent_languages` - Original languages of their most recent movie
    ///   credits, newest first
    fn passes(&self, candidate: &ActorCandidate, recent_languages: &[LanguageCode]) -> bool;
}
