//! The ranked list of movies that count as correct answers for one round.

use catalog::{CuratedMovie, MovieId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Number of movies in an answer set unless configured otherwise
pub const DEFAULT_ANSWER_SIZE: usize = 5;

/// An actor's highest-grossing movies, highest revenue first.
///
/// Built once per round and never modified. Ids are unique, so membership
/// checks go through an id set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AnswerSetData", into = "AnswerSetData")]
pub struct AnswerSet {
    actor_name: String,
    movies: Vec<CuratedMovie>,
    ids: HashSet<MovieId>,
}

impl AnswerSet {
    /// Build an answer set of at most `DEFAULT_ANSWER_SIZE` movies
    pub fn new(actor_name: impl Into<String>, movies: Vec<CuratedMovie>) -> Self {
        Self::with_limit(actor_name, movies, DEFAULT_ANSWER_SIZE)
    }

    /// Build an answer set of at most `limit` movies.
    ///
    /// ## Algorithm
    /// 1. Drop repeated movie ids, keeping the first occurrence
    /// 2. Stable sort by revenue, highest first (ties keep input order)
    /// 3. Keep the first `limit`
    pub fn with_limit(actor_name: impl Into<String>, movies: Vec<CuratedMovie>, limit: usize) -> Self {
        let mut ids = HashSet::with_capacity(movies.len());
        let mut unique: Vec<CuratedMovie> = movies.into_iter().filter(|m| ids.insert(m.id)).collect();

        unique.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        unique.truncate(limit);

        let ids = unique.iter().map(|m| m.id).collect();
        Self {
            actor_name: actor_name.into(),
            movies: unique,
            ids,
        }
    }

    pub fn actor_name(&self) -> &str {
        &self.actor_name
    }

    /// Movies in rank order
    pub fn movies(&self) -> &[CuratedMovie] {
        &self.movies
    }

    pub fn contains(&self, movie_id: MovieId) -> bool {
        self.ids.contains(&movie_id)
    }

    pub fn get(&self, movie_id: MovieId) -> Option<&CuratedMovie> {
        self.movies.iter().find(|m| m.id == movie_id)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Highest revenue in the set, 0 when empty
    pub fn max_revenue(&self) -> u64 {
        max_revenue(&self.movies)
    }
}

/// Highest revenue over a list of movies, 0 when the list is empty
pub fn max_revenue<'a>(movies: impl IntoIterator<Item = &'a CuratedMovie>) -> u64 {
    movies.into_iter().map(|m| m.revenue).max().unwrap_or(0)
}

/// Persisted form; the id set is rebuilt on load
#[derive(Serialize, Deserialize)]
struct AnswerSetData {
    actor_name: String,
    movies: Vec<CuratedMovie>,
}

impl From<AnswerSetData> for AnswerSet {
    fn from(data: AnswerSetData) -> Self {
        let limit = data.movies.len();
        Self::with_limit(data.actor_name, data.movies, limit)
    }
}

impl From<AnswerSet> for AnswerSetData {
    fn from(set: AnswerSet) -> Self {
        Self {
            actor_name: set.actor_name,
            movies: set.movies,
        }
    }
}
