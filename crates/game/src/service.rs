//! # Game Service
//!
//! This module coordinates a round from start to finish:
//! 1. Pick an actor (given, or a random eligible actor from the catalog)
//! 2. Build the answer set (catalog first, curator as fallback)
//! 3. Store a fresh `GameSession` under the player's session id
//! 4. For each guess: load, validate, resolve the movie, apply, save
//!
//! A guess holds the session's lock from load to save, so double submits
//! for one session run one after the other. Any failure before the save
//! leaves the stored round unchanged. A session's lock entry lives exactly as
//! long as someone holds or waits on it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, instrument};

use catalog::{ActorCandidate, CatalogStore};
use curation::{AnswerSet, CatalogFilter, MovieCurator};
use provider::{MetadataProvider, MovieSearchHit};

use crate::error::{GameError, Result};
use crate::resolver::MovieResolver;
use crate::session::{GameSession, GuessOutcome, RoundProgress};
use crate::store::{RoundStateStore, SessionId};

/// What the player sees when a round starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundStart {
    pub actor_name: String,
    /// Size of the answer set
    pub answers_total: usize,
    pub strikes: u8,
    pub terminal: bool,
}

type LockMap = StdMutex<HashMap<SessionId, Arc<Mutex<()>>>>;

/// Exclusive hold on one session; drops the map entry when nobody else needs it
struct SessionLease<'a> {
    locks: &'a LockMap,
    session: SessionId,
    lock: Arc<Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionLease<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // clones are only handed out under the map lock, so two means map + us
        let idle = locks
            .get(&self.session)
            .is_some_and(|entry| Arc::ptr_eq(entry, &self.lock) && Arc::strong_count(&self.lock) == 2);
        if idle {
            locks.remove(&self.session);
        }
    }
}

/// The game's public API
pub struct GameService {
    catalog: Arc<dyn CatalogStore>,
    curator: Arc<MovieCurator>,
    filter: Arc<CatalogFilter>,
    resolver: MovieResolver,
    store: Arc<dyn RoundStateStore>,
    locks: LockMap,
}

impl GameService {
    /// Create a service with the default curation and eligibility policies
    ///
    /// # Arguments
    /// * `catalog` - Local catalog, consulted before the provider
    /// * `provider` - External movie metadata
    /// * `store` - Where round state lives between requests
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        provider: Arc<dyn MetadataProvider>,
        store: Arc<dyn RoundStateStore>,
    ) -> Self {
        Self {
            resolver: MovieResolver::new(catalog.clone(), provider.clone()),
            curator: Arc::new(MovieCurator::new(provider)),
            filter: Arc::new(CatalogFilter::default()),
            catalog,
            store,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    pub fn with_curator(mut self, curator: Arc<MovieCurator>) -> Self {
        self.curator = curator;
        self
    }

    pub fn with_filter(mut self, filter: Arc<CatalogFilter>) -> Self {
        self.filter = filter;
        self
    }

    async fn lock_session(&self, session: &SessionId) -> SessionLease<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.entry(session.clone()).or_default().clone()
        };
        let mut lease = SessionLease {
            locks: &self.locks,
            session: session.clone(),
            lock,
            guard: None,
        };
        lease.guard = Some(lease.lock.clone().lock_owned().await);
        lease
    }

    #[cfg(test)]
    fn lock_entries(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    /// Start a new round, replacing whatever round the session had.
    ///
    /// # Arguments
    /// * `session` - The player's session id
    /// * `actor` - Actor to play; a random eligible catalog actor when `None`
    #[instrument(skip(self))]
    pub async fn start_round(&self, session: &SessionId, actor: Option<&str>) -> Result<RoundStart> {
        let _lease = self.lock_session(session).await;

        let actor_name = match actor.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => self
                .catalog
                .find_actor_by_name(name)
                .map(|record| record.name)
                .unwrap_or_else(|| name.to_string()),
            None => {
                self.catalog
                    .random_eligible_actor()
                    .ok_or(GameError::NoEligibleActor)?
                    .name
            }
        };

        let answers = self.answers_for(&actor_name).await?;
        let state = GameSession::new(answers);
        self.store.save(session, &state).await?;

        info!(
            "Started round for {} with {} answers",
            state.actor_name(),
            state.answers().len()
        );
        Ok(RoundStart {
            actor_name: state.actor_name().to_string(),
            answers_total: state.answers().len(),
            strikes: state.strikes(),
            terminal: state.is_terminal(),
        })
    }

    /// Catalog movies when the actor has any, otherwise a fresh curation
    async fn answers_for(&self, actor_name: &str) -> Result<AnswerSet> {
        let answer_size = self.curator.policy().answer_size;
        let movies = self.catalog.top_actor_movies(actor_name, answer_size);
        if !movies.is_empty() {
            return Ok(AnswerSet::with_limit(actor_name, movies, answer_size));
        }
        Ok(self.curator.curate(actor_name).await?)
    }

    /// Submit one guess for the session's current round.
    ///
    /// ## Algorithm
    /// 1. Load the round (`NoActiveRound` if there is none)
    /// 2. Validate the raw id (terminal, empty, malformed, duplicate)
    /// 3. Resolve the movie (answer set, catalog, provider)
    /// 4. Apply the guess and save the round
    #[instrument(skip(self))]
    pub async fn submit_guess(&self, session: &SessionId, raw_movie_id: &str) -> Result<GuessOutcome> {
        let _lease = self.lock_session(session).await;

        let mut state = self.store.load(session).await?.ok_or(GameError::NoActiveRound)?;
        let movie_id = state.validate_guess(raw_movie_id)?;
        let movie = self.resolver.resolve(movie_id, state.answers()).await?;
        let outcome = state.record_guess(movie)?;
        self.store.save(session, &state).await?;

        info!(
            "Guess {} for {}: correct={} strikes={} status={:?}",
            movie_id,
            state.actor_name(),
            outcome.correct,
            outcome.strikes,
            outcome.status
        );
        Ok(outcome)
    }

    pub async fn progress(&self, session: &SessionId) -> Result<RoundProgress> {
        let state = self.store.load(session).await?.ok_or(GameError::NoActiveRound)?;
        Ok(state.progress())
    }

    /// Discard the session's round
    pub async fn end_round(&self, session: &SessionId) -> Result<()> {
        let _lease = self.lock_session(session).await;
        self.store.clear(session).await?;
        Ok(())
    }

    /// Curate an actor's answer set straight from the provider
    pub async fn curate_actor(&self, actor_name: &str) -> Result<AnswerSet> {
        Ok(self.curator.curate(actor_name).await?)
    }

    pub fn is_actor_eligible(&self, candidate: &ActorCandidate) -> bool {
        self.filter.is_candidate_eligible(candidate)
    }

    pub async fn search_movies(&self, query: &str) -> Result<Vec<MovieSearchHit>> {
        self.resolver.search(query).await
    }
}
