//! In-memory metadata provider.
//!
//! Serves a fixed set of people, credits and movie details. Used by tests
//! across the workspace and for offline runs. Individual movie details can be
//! marked as failing to exercise the curator's skip-on-error path.

use crate::error::{ProviderError, Result};
use crate::types::{MovieDetail, MovieSearchHit, PersonSummary};
use crate::MetadataProvider;
use async_trait::async_trait;
use catalog::{ActorId, MovieCredit, MovieId, release_year_from_date};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// People per page of `popular_people`, matching TMDB
const PAGE_SIZE: usize = 20;

#[derive(Debug, Default)]
pub struct StaticProvider {
    people: HashMap<String, PersonSummary>,
    credits: HashMap<ActorId, Vec<MovieCredit>>,
    details: HashMap<MovieId, MovieDetail>,
    failing_details: HashSet<MovieId>,
    popular: Vec<PersonSummary>,
    trending: Vec<PersonSummary>,
    detail_calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an actor so `search_person` can resolve them
    pub fn with_person(self, id: ActorId, name: &str) -> Self {
        self.with_person_summary(PersonSummary {
            id,
            name: name.to_string(),
            popularity: 0.0,
            known_for_department: Some("Acting".to_string()),
            known_for: Vec::new(),
        })
    }

    pub fn with_person_summary(mut self, person: PersonSummary) -> Self {
        self.people.insert(person.name.trim().to_lowercase(), person);
        self
    }

    pub fn with_credit(mut self, person_id: ActorId, credit: MovieCredit) -> Self {
        self.credits.entry(person_id).or_default().push(credit);
        self
    }

    pub fn with_detail(mut self, detail: MovieDetail) -> Self {
        self.details.insert(detail.id, detail);
        self
    }

    /// Make `movie_detail` fail with a transient error for this id
    pub fn with_failing_detail(mut self, movie_id: MovieId) -> Self {
        self.failing_details.insert(movie_id);
        self
    }

    pub fn with_popular(mut self, person: PersonSummary) -> Self {
        self.popular.push(person);
        self
    }

    pub fn with_trending(mut self, person: PersonSummary) -> Self {
        self.trending.push(person);
        self
    }

    /// How many times `movie_detail` has been called
    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for StaticProvider {
    async fn find_person(&self, name: &str) -> Result<PersonSummary> {
        self.people
            .get(&name.trim().to_lowercase())
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("No results found for actor: {}", name)))
    }

    async fn movie_credits(&self, person_id: ActorId) -> Result<Vec<MovieCredit>> {
        Ok(self.credits.get(&person_id).cloned().unwrap_or_default())
    }

    async fn movie_detail(&self, movie_id: MovieId) -> Result<MovieDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_details.contains(&movie_id) {
            return Err(ProviderError::Transient(format!("movie {} unavailable", movie_id)));
        }
        self.details
            .get(&movie_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("movie {}", movie_id)))
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSearchHit>> {
        let needle = query.trim().to_lowercase();
        let mut hits: Vec<MovieSearchHit> = self
            .details
            .values()
            .filter(|d| !needle.is_empty() && d.title.to_lowercase().contains(&needle))
            .map(|d| MovieSearchHit {
                id: d.id,
                title: d.title.clone(),
                year: d
                    .release_date
                    .as_deref()
                    .and_then(release_year_from_date)
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            })
            .collect();
        hits.sort_by_key(|h| h.id);
        hits.truncate(10);
        Ok(hits)
    }

    async fn popular_people(&self, page: u32) -> Result<Vec<PersonSummary>> {
        let start = (page.max(1) as usize - 1) * PAGE_SIZE;
        Ok(self.popular.iter().skip(start).take(PAGE_SIZE).cloned().collect())
    }

    async fn trending_people(&self) -> Result<Vec<PersonSummary>> {
        Ok(self.trending.clone())
    }
}
