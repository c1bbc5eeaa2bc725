//! Movie curation: from an actor's credits to the round's answer set.
//!
//! ## Algorithm
//! 1. Resolve the actor name to a provider person id
//! 2. Fetch all movie credits
//! 3. Keep credits with billing order <= `max_billing_order` (real roles,
//!    not cameos), once per movie
//! 4. Fetch details for each kept credit, one at a time
//!    - a failed lookup skips that movie
//!    - unreleased movies (no release date) are skipped
//!    - movies whose releases are all TV are skipped
//! 5. Stable sort by revenue, highest first; missing revenue counts as 0
//! 6. Keep the first `answer_size`

use crate::answer_set::AnswerSet;
use crate::cache::CurationCache;
use crate::error::{CurationError, Result};
use crate::policy::CurationPolicy;
use catalog::{CuratedMovie, MovieCredit};
use provider::{MetadataProvider, MovieDetail};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A curated movie together with the actor's billing order in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMovie {
    pub movie: CuratedMovie,
    pub billing_order: u32,
}

pub struct MovieCurator {
    provider: Arc<dyn MetadataProvider>,
    policy: CurationPolicy,
    cache: Option<Arc<dyn CurationCache>>,
}

impl MovieCurator {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            provider,
            policy: CurationPolicy::default(),
            cache: None,
        }
    }

    pub fn with_policy(mut self, policy: CurationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn CurationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn policy(&self) -> &CurationPolicy {
        &self.policy
    }

    /// Curate the answer set for an actor by name.
    ///
    /// # Returns
    /// * `Ok(AnswerSet)` - Possibly empty if no credit qualified
    /// * `Err(ActorNotFound)` - The provider knows no such person
    /// * `Err` - Person search or credit lookup failed
    #[instrument(skip(self))]
    pub async fn curate(&self, actor_name: &str) -> Result<AnswerSet> {
        let actor_name = actor_name.trim();

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(actor_name) {
                debug!("Answer set for {} served from cache", actor_name);
                return Ok(hit);
            }
        }

        let person_id = self.provider.search_person(actor_name).await.map_err(|e| {
            if e.is_not_found() {
                CurationError::ActorNotFound(actor_name.to_string())
            } else {
                CurationError::Provider(e)
            }
        })?;

        let credits = self.provider.movie_credits(person_id).await?;
        let answer = self.curate_credits(actor_name, credits).await?;

        if let Some(cache) = &self.cache {
            cache.put(answer.clone());
        }
        Ok(answer)
    }

    /// Curate an answer set from credits that were already fetched.
    pub async fn curate_credits(&self, actor_name: &str, credits: Vec<MovieCredit>) -> Result<AnswerSet> {
        let ranked = self.rank_credits(actor_name, credits).await?;
        let movies = ranked.into_iter().map(|r| r.movie).collect();
        let answer = AnswerSet::with_limit(actor_name, movies, self.policy.answer_size);

        info!("Curated {} movies for {}", answer.len(), actor_name);
        Ok(answer)
    }

    /// Steps 3 to 6 of the curation algorithm, keeping billing orders.
    ///
    /// Fails only when there was at least one lookup and every one of them
    /// failed; an actor with no qualifying credits gets an empty list.
    pub async fn rank_credits(&self, actor_name: &str, credits: Vec<MovieCredit>) -> Result<Vec<RankedMovie>> {
        let roles = significant_roles(credits, self.policy.max_billing_order);
        debug!("{} has {} significant roles", actor_name, roles.len());

        let mut details = Vec::with_capacity(roles.len());
        let mut failed = 0;
        let mut last_error = None;

        for credit in &roles {
            match self.provider.movie_detail(credit.id).await {
                Ok(detail) => details.push((detail, credit.billing_order)),
                Err(e) => {
                    warn!("Skipping movie {} ({}): {}", credit.id, credit.title, e);
                    failed += 1;
                    last_error = Some(e.to_string());
                }
            }
        }

        if failed > 0 && failed == roles.len() {
            return Err(CurationError::DetailsUnavailable {
                actor: actor_name.to_string(),
                failed,
                last_error: last_error.unwrap_or_default(),
            });
        }

        Ok(select_movies(details, self.policy.answer_size))
    }
}

/// Credits billed at or above `max_billing_order`, first credit per movie.
pub fn significant_roles(credits: Vec<MovieCredit>, max_billing_order: u32) -> Vec<MovieCredit> {
    let mut seen = HashSet::new();
    credits
        .into_iter()
        .filter(|c| c.billing_order <= max_billing_order)
        .filter(|c| seen.insert(c.id))
        .collect()
}

/// Pick the top `limit` theatrically released movies by revenue.
///
/// Input order breaks revenue ties.
pub fn select_movies(details: Vec<(MovieDetail, u32)>, limit: usize) -> Vec<RankedMovie> {
    let mut ranked: Vec<RankedMovie> = details
        .into_iter()
        .filter(|(detail, _)| {
            if !detail.has_release_date() {
                debug!("Skipping unreleased movie: {}", detail.title);
                return false;
            }
            if detail.is_tv_release() {
                debug!("Skipping TV movie: {}", detail.title);
                return false;
            }
            true
        })
        .map(|(detail, billing_order)| RankedMovie {
            movie: detail.to_curated(),
            billing_order,
        })
        .collect();

    ranked.sort_by(|a, b| b.movie.revenue.cmp(&a.movie.revenue));
    ranked.truncate(limit);
    ranked
}
