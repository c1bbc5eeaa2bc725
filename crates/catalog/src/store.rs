//! The Catalog Store interface used by the game and the curator.
//!
//! The catalog acts as a cache and primary source ahead of the metadata
//! provider. `CatalogIndex` is the in-memory implementation.

use crate::types::*;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, warn};

/// How many movies `actor_movies` returns by default
pub const ACTOR_MOVIES_LIMIT: usize = 5;

/// How many results a title search returns
pub const SEARCH_LIMIT: usize = 10;

/// Read access to the local catalog.
///
/// Methods return owned values so implementations can sit behind locks or
/// remote connections.
pub trait CatalogStore: Send + Sync {
    fn find_movie_by_id(&self, id: MovieId) -> Option<CuratedMovie>;

    /// Case-insensitive substring search over titles, at most `SEARCH_LIMIT`
    fn find_movies_by_title_substring(&self, query: &str) -> Vec<CuratedMovie>;

    /// Case-insensitive lookup by name
    fn find_actor_by_name(&self, name: &str) -> Option<ActorRecord>;

    /// A random actor with at least one movie
    fn random_eligible_actor(&self) -> Option<ActorRecord>;

    /// At most `limit` of an actor's highest-grossing movies, revenue descending
    fn top_actor_movies(&self, actor_name: &str, limit: usize) -> Vec<CuratedMovie>;

    /// Highest-grossing movies of an actor, at most `ACTOR_MOVIES_LIMIT`
    fn actor_movies(&self, actor_name: &str) -> Vec<CuratedMovie> {
        self.top_actor_movies(actor_name, ACTOR_MOVIES_LIMIT)
    }
}

impl CatalogIndex {
    /// Pick an actor with at least one movie using the supplied RNG.
    ///
    /// Candidates are ordered by id first, so a seeded RNG gives a
    /// reproducible pick.
    pub fn pick_actor_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&ActorRecord> {
        let eligible: Vec<ActorId> = self
            .actor_ids()
            .into_iter()
            .filter(|id| !self.get_appearances(*id).is_empty())
            .collect();

        let picked = eligible.choose(rng).and_then(|id| self.actors.get(id));
        match picked {
            Some(actor) => debug!("Picked random actor: {}", actor.name),
            None => warn!("No actors with movies in catalog"),
        }
        picked
    }
}

impl CatalogStore for CatalogIndex {
    fn find_movie_by_id(&self, id: MovieId) -> Option<CuratedMovie> {
        self.get_movie(id).cloned()
    }

    fn find_movies_by_title_substring(&self, query: &str) -> Vec<CuratedMovie> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        // (relevance, movie): exact title match first, then substring match
        let mut matches: Vec<(u8, &CuratedMovie)> = self
            .movies
            .values()
            .filter_map(|movie| {
                let title = movie.title.to_lowercase();
                if title == needle {
                    Some((0, movie))
                } else if title.contains(&needle) {
                    Some((1, movie))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| b.1.revenue.cmp(&a.1.revenue))
                .then_with(|| a.1.id.cmp(&b.1.id))
        });

        debug!("Found {} movies matching '{}'", matches.len(), query);
        matches
            .into_iter()
            .take(SEARCH_LIMIT)
            .map(|(_, movie)| movie.clone())
            .collect()
    }

    fn find_actor_by_name(&self, name: &str) -> Option<ActorRecord> {
        self.get_actor_by_name(name).cloned()
    }

    fn random_eligible_actor(&self) -> Option<ActorRecord> {
        self.pick_actor_with(&mut rand::rng()).cloned()
    }

    fn top_actor_movies(&self, actor_name: &str, limit: usize) -> Vec<CuratedMovie> {
        let Some(actor) = self.get_actor_by_name(actor_name) else {
            warn!("Actor not found: {}", actor_name);
            return Vec::new();
        };

        let mut movies: Vec<CuratedMovie> = self
            .get_appearances(actor.id)
            .iter()
            .filter_map(|a| self.get_movie(a.movie_id).cloned())
            .collect();

        // sort_by is stable: equal revenue keeps appearance order
        movies.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        movies.truncate(limit);

        debug!("Found {} movies for {}", movies.len(), actor_name);
        movies
    }
}
