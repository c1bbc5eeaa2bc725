//! The CatalogFilter decides which actors are admitted into the game.
//!
//! This module provides the CatalogFilter struct that chains eligibility
//! rules together using the builder pattern. An actor is eligible only if
//! every rule passes.

use crate::filters::{KnownForLanguageFilter, MinimumCreditsFilter, RecentLanguageFilter};
use crate::policy::EligibilityPolicy;
use crate::traits::Filter;
use catalog::{ActorCandidate, LanguageCode};
use rayon::prelude::*;
use tracing::{debug, info};

/// Chains eligibility rules into one yes/no decision.
///
/// ## Usage
/// ```ignore
/// let filter = CatalogFilter::from_policy(&EligibilityPolicy::default());
/// let admitted = filter.screen(candidates);
/// ```
pub struct CatalogFilter {
    filters: Vec<Box<dyn Filter>>,
    policy: EligibilityPolicy,
}

impl CatalogFilter {
    /// Create an empty CatalogFilter that admits everyone.
    pub fn new(policy: EligibilityPolicy) -> Self {
        Self {
            filters: Vec::new(),
            policy,
        }
    }

    /// The standard rule chain: minimum credits, known-for language, recent
    /// credit language.
    pub fn from_policy(policy: &EligibilityPolicy) -> Self {
        Self::new(policy.clone())
            .add_filter(MinimumCreditsFilter::new(policy.min_movie_credits))
            .add_filter(KnownForLanguageFilter::new(policy.known_for_english_pct))
            .add_filter(RecentLanguageFilter::new(
                policy.recent_sample_size,
                policy.recent_english_pct,
            ))
    }

    /// Add a filter to the chain (builder pattern).
    ///
    /// # Arguments
    /// * `filter` - Any type implementing the Filter trait
    ///
    /// # Returns
    /// Self for method chaining
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn policy(&self) -> &EligibilityPolicy {
        &self.policy
    }

    /// Decide whether an actor may be admitted.
    ///
    /// ## Algorithm
    /// 1. Cut `recent_languages` down to the sample size
    /// 2. Run each rule in order, stopping at the first failure
    /// 3. Log which rule rejected the actor
    ///
    /// # Arguments
    /// * `candidate` - The actor being screened
    /// * `recent_languages` - Languages of their most recent credits, newest
    ///   first; longer lists are truncated
    pub fn is_eligible(&self, candidate: &ActorCandidate, recent_languages: &[LanguageCode]) -> bool {
        let sample = &recent_languages[..recent_languages.len().min(self.policy.recent_sample_size)];
        for filter in &self.filters {
            if !filter.passes(candidate, sample) {
                info!("Skipping {}: rejected by {}", candidate.name, filter.name());
                return false;
            }
        }
        debug!("{} is eligible", candidate.name);
        true
    }

    /// `is_eligible` using the languages carried on the candidate itself
    pub fn is_candidate_eligible(&self, candidate: &ActorCandidate) -> bool {
        self.is_eligible(candidate, &candidate.recent_credit_languages)
    }

    /// Screen a pool of candidates in parallel.
    ///
    /// Returns the eligible candidates in their original order.
    pub fn screen(&self, candidates: Vec<ActorCandidate>) -> Vec<ActorCandidate> {
        let input = candidates.len();
        let admitted: Vec<ActorCandidate> = candidates
            .into_par_iter()
            .filter(|candidate| self.is_candidate_eligible(candidate))
            .collect();
        debug!("Screened {} candidates, {} eligible", input, admitted.len());
        admitted
    }
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self::from_policy(&EligibilityPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::KnownFor;

    fn candidate(id: u32, credits: usize, known_for: Vec<KnownFor>) -> ActorCandidate {
        ActorCandidate {
            id,
            name: format!("Actor {}", id),
            popularity: 10.0,
            known_for,
            total_movie_credits: credits,
            recent_credit_languages: vec![LanguageCode::english(); 20],
        }
    }

    #[test]
    fn test_empty_chain_admits_everyone() {
        let filter = CatalogFilter::new(EligibilityPolicy::default());
        assert!(filter.is_candidate_eligible(&candidate(1, 0, vec![])));
    }

    #[test]
    fn test_english_actor_is_eligible() {
        let filter = CatalogFilter::default();
        let actor = candidate(
            1,
            40,
            vec![
                KnownFor::movie("A", "en"),
                KnownFor::movie("B", "en"),
                KnownFor::movie("C", "fr"),
            ],
        );
        let mut recent = vec![LanguageCode::english(); 15];
        recent.extend(vec![LanguageCode::new("es"); 5]);

        assert!(filter.is_eligible(&actor, &recent));
    }

    #[test]
    fn test_non_english_actor_is_rejected() {
        let filter = CatalogFilter::default();
        let actor = candidate(
            2,
            60,
            vec![
                KnownFor::movie("A", "ko"),
                KnownFor::movie("B", "ko"),
                KnownFor::movie("C", "ko"),
            ],
        );
        let mut recent = vec![LanguageCode::new("ko"); 18];
        recent.extend(vec![LanguageCode::english(); 2]);

        assert!(!filter.is_eligible(&actor, &recent));
    }

    #[test]
    fn test_recent_languages_are_truncated_to_sample() {
        let filter = CatalogFilter::default();
        let actor = candidate(3, 40, vec![]);
        let mut recent = vec![LanguageCode::english(); 20];
        recent.extend(vec![LanguageCode::new("hi"); 40]);

        assert!(filter.is_eligible(&actor, &recent));
    }

    #[test]
    fn test_screen_preserves_order() {
        let filter = CatalogFilter::default();
        let pool: Vec<ActorCandidate> = (1..=50)
            .map(|id| candidate(id, if id % 3 == 0 { 5 } else { 30 }, vec![]))
            .collect();

        let admitted = filter.screen(pool);
        let ids: Vec<u32> = admitted.iter().map(|c| c.id).collect();
        let expected: Vec<u32> = (1..=50).filter(|id| id % 3 != 0).collect();
        assert_eq!(ids, expected);
    }
}
