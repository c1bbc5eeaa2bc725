//! Catalog sweep: grow and refresh the local catalog from the provider.
//!
//! ## Algorithm
//! 1. Collect a pool of people from the popular list (several pages) or the
//!    weekly trending list
//! 2. Keep people known for acting, most popular first, at most `pool_size`
//! 3. For each, fetch movie credits and build an `ActorCandidate`
//!    - `total_movie_credits` is the number of credits
//!    - recent languages come from credits sorted newest first, undated last
//! 4. Screen the candidates with the `CatalogFilter`
//! 5. Curate every eligible actor from the credits already fetched
//! 6. Upsert actor, movies and billing orders into the `CatalogIndex`
//! 7. Prune actors not refreshed within `max_age_days`
//!
//! Provider calls are made one at a time so the client's request spacing
//! holds across the whole sweep.

use crate::cache::CurationCache;
use crate::catalog_filter::CatalogFilter;
use crate::curator::MovieCurator;
use crate::error::Result;
use catalog::{ActorCandidate, ActorId, ActorRecord, CatalogIndex, MovieCredit};
use provider::{MetadataProvider, PersonSummary};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

const SECONDS_PER_DAY: i64 = 86_400;

/// Where the sweep finds people
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolSource {
    Popular,
    Trending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub source: PoolSource,
    /// Popular-list pages to read (ignored for trending)
    pub pages: u32,
    pub pool_size: usize,
    /// Actors not refreshed within this many days are pruned
    pub max_age_days: i64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            source: PoolSource::Popular,
            pages: 5,
            pool_size: 100,
            max_age_days: 365,
        }
    }
}

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepReport {
    pub considered: usize,
    /// Actors written to the catalog
    pub admitted: Vec<String>,
    pub ineligible: Vec<String>,
    /// Actors skipped because a provider call failed, with the error
    pub failed: Vec<(String, String)>,
    pub movies_added: usize,
    /// Actors removed as outdated
    pub pruned: Vec<String>,
}

pub struct CatalogSweep {
    provider: Arc<dyn MetadataProvider>,
    filter: CatalogFilter,
    curator: MovieCurator,
    cache: Option<Arc<dyn CurationCache>>,
    config: SweepConfig,
}

impl CatalogSweep {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        filter: CatalogFilter,
        curator: MovieCurator,
        config: SweepConfig,
    ) -> Self {
        Self {
            provider,
            filter,
            curator,
            cache: None,
            config,
        }
    }

    /// Cache to invalidate for every actor the sweep refreshes
    pub fn with_cache(mut self, cache: Arc<dyn CurationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Steps 1 and 2: the people worth screening.
    ///
    /// A failed page is logged and skipped.
    pub async fn fetch_pool(&self) -> Vec<PersonSummary> {
        let mut people = Vec::new();
        match self.config.source {
            PoolSource::Popular => {
                for page in 1..=self.config.pages {
                    match self.provider.popular_people(page).await {
                        Ok(batch) => people.extend(batch),
                        Err(e) => warn!("Failed to fetch popular people page {}: {}", page, e),
                    }
                }
            }
            PoolSource::Trending => match self.provider.trending_people().await {
                Ok(batch) => people.extend(batch),
                Err(e) => warn!("Failed to fetch trending people: {}", e),
            },
        }

        let mut seen = HashSet::new();
        let mut actors: Vec<PersonSummary> = people
            .into_iter()
            .filter(|p| p.is_actor() && seen.insert(p.id))
            .collect();
        actors.sort_by(|a, b| {
            b.popularity
                .partial_cmp(&a.popularity)
                .unwrap_or(Ordering::Equal)
        });
        actors.truncate(self.config.pool_size);

        info!("Sweep pool has {} actors", actors.len());
        actors
    }

    /// Step 3 for one person; also returns the credits for curation.
    pub async fn build_candidate(&self, person: &PersonSummary) -> Result<(ActorCandidate, Vec<MovieCredit>)> {
        let credits = self.provider.movie_credits(person.id).await?;
        let candidate = candidate_from_credits(person, &credits, self.filter.policy().recent_sample_size);
        Ok((candidate, credits))
    }

    /// Run a full sweep stamped with the current time.
    pub async fn run(&self, catalog: &mut CatalogIndex) -> SweepReport {
        self.run_at(catalog, chrono::Utc::now().timestamp()).await
    }

    /// Run a full sweep; upserted actors get `last_updated = now`.
    pub async fn run_at(&self, catalog: &mut CatalogIndex, now: i64) -> SweepReport {
        let pool = self.fetch_pool().await;
        let mut report = SweepReport {
            considered: pool.len(),
            ..SweepReport::default()
        };

        let mut candidates = Vec::with_capacity(pool.len());
        let mut credits_by_actor: HashMap<ActorId, Vec<MovieCredit>> = HashMap::new();
        for person in &pool {
            match self.build_candidate(person).await {
                Ok((candidate, credits)) => {
                    credits_by_actor.insert(person.id, credits);
                    candidates.push(candidate);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", person.name, e);
                    report.failed.push((person.name.clone(), e.to_string()));
                }
            }
        }

        let eligible = self.filter.screen(candidates.clone());
        let eligible_ids: HashSet<ActorId> = eligible.iter().map(|c| c.id).collect();
        report.ineligible = candidates
            .iter()
            .filter(|c| !eligible_ids.contains(&c.id))
            .map(|c| c.name.clone())
            .collect();

        for candidate in eligible {
            let credits = credits_by_actor.remove(&candidate.id).unwrap_or_default();
            let ranked = match self.curator.rank_credits(&candidate.name, credits).await {
                Ok(ranked) => ranked,
                Err(e) => {
                    warn!("Skipping {}: {}", candidate.name, e);
                    report.failed.push((candidate.name.clone(), e.to_string()));
                    continue;
                }
            };

            let movies: Vec<_> = ranked.into_iter().map(|r| (r.movie, r.billing_order)).collect();
            let record = ActorRecord {
                id: candidate.id,
                name: candidate.name.clone(),
                popularity: candidate.popularity,
                last_updated: now,
            };
            report.movies_added += catalog.upsert_actor(record, &movies);
            if let Some(cache) = &self.cache {
                cache.invalidate(&candidate.name);
            }
            info!("Added {} with {} movies", candidate.name, movies.len());
            report.admitted.push(candidate.name);
        }

        let cutoff = now - self.config.max_age_days * SECONDS_PER_DAY;
        for actor in catalog.prune_outdated(cutoff) {
            if let Some(cache) = &self.cache {
                cache.invalidate(&actor.name);
            }
            report.pruned.push(actor.name);
        }

        info!(
            "Sweep done: {} considered, {} admitted, {} ineligible, {} failed, {} pruned",
            report.considered,
            report.admitted.len(),
            report.ineligible.len(),
            report.failed.len(),
            report.pruned.len()
        );
        report
    }
}

/// Build the filter's view of a person from their movie credits.
///
/// Recent languages are taken from credits ordered by release date, newest
/// first; credits without a date sort last.
pub fn candidate_from_credits(person: &PersonSummary, credits: &[MovieCredit], sample_size: usize) -> ActorCandidate {
    let mut by_date: Vec<&MovieCredit> = credits.iter().collect();
    by_date.sort_by(|a, b| match (&a.release_date, &b.release_date) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    ActorCandidate {
        id: person.id,
        name: person.name.clone(),
        popularity: person.popularity,
        known_for: person.known_for.clone(),
        total_movie_credits: credits.len(),
        recent_credit_languages: by_date
            .into_iter()
            .take(sample_size)
            .map(|c| c.original_language.clone())
            .collect(),
    }
}
