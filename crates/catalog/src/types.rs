//! Core domain types for the trivia catalog.
//!
//! This module defines the data structures shared by every crate in the
//! workspace: identifiers, raw provider credits, curated movies, actor
//! candidates and the in-memory `CatalogIndex`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a person (TMDB person id)
pub type ActorId = u32;

/// Unique identifier for a movie (TMDB movie id)
pub type MovieId = u32;

// =============================================================================
// Language / media tags
// =============================================================================

/// ISO-639-1 language code, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_lowercase())
    }

    pub fn english() -> Self {
        Self("en".to_string())
    }

    pub fn is_english(&self) -> bool {
        self.0 == "en"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for LanguageCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

/// Media type of a "known for" entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

/// One entry of a person's marketing-curated "known for" list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownFor {
    pub title: String,
    pub media_type: MediaType,
    pub original_language: LanguageCode,
}

impl KnownFor {
    pub fn movie(title: impl Into<String>, language: impl Into<LanguageCode>) -> Self {
        Self {
            title: title.into(),
            media_type: MediaType::Movie,
            original_language: language.into(),
        }
    }

    pub fn tv(title: impl Into<String>, language: impl Into<LanguageCode>) -> Self {
        Self {
            title: title.into(),
            media_type: MediaType::Tv,
            original_language: language.into(),
        }
    }
}

// =============================================================================
// Movie-related Types
// =============================================================================

/// A raw movie credit as reported by the metadata provider.
///
/// Transient: only lives for the duration of a curation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieCredit {
    pub id: MovieId,
    pub title: String,
    /// `YYYY-MM-DD` as reported upstream; `None` when the provider has no date
    pub release_date: Option<String>,
    pub revenue: Option<u64>,
    /// Position in the cast list, lower is more prominent
    pub billing_order: u32,
    pub original_language: LanguageCode,
}

/// A movie that made it through curation (or was stored in the catalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedMovie {
    pub id: MovieId,
    pub title: String,
    /// Four-digit release year, `None` when unknown
    pub release_year: Option<u16>,
    /// Worldwide gross; 0 when unknown
    pub revenue: u64,
    pub poster_path: Option<String>,
}

impl CuratedMovie {
    pub fn new(id: MovieId, title: impl Into<String>, revenue: u64) -> Self {
        Self {
            id,
            title: title.into(),
            release_year: None,
            revenue,
            poster_path: None,
        }
    }

    pub fn with_release_year(mut self, year: u16) -> Self {
        self.release_year = Some(year).filter(|y| (1000..=9999).contains(y));
        self
    }

    pub fn with_poster_path(mut self, path: impl Into<String>) -> Self {
        self.poster_path = Some(path.into());
        self
    }

    /// Year label used in listings ("N/A" when unknown)
    pub fn year_label(&self) -> String {
        self.release_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Extract a four-digit year from a `YYYY-MM-DD` style date.
///
/// Returns `None` for empty strings and anything whose first four characters
/// are not a year.
pub fn release_year_from_date(date: &str) -> Option<u16> {
    let prefix = date.trim().get(..4)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse::<u16>().ok().filter(|y| *y >= 1000)
}

// =============================================================================
// Actor-related Types
// =============================================================================

/// Everything the eligibility filter needs to know about a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorCandidate {
    pub id: ActorId,
    pub name: String,
    pub popularity: f32,
    pub known_for: Vec<KnownFor>,
    /// Size of the person's full movie filmography
    pub total_movie_credits: usize,
    /// Original languages of the most recent movie credits, newest first
    pub recent_credit_languages: Vec<LanguageCode>,
}

/// An actor admitted into the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorRecord {
    pub id: ActorId,
    pub name: String,
    pub popularity: f32,
    /// Unix timestamp (seconds) of the last refresh
    pub last_updated: i64,
}

/// Link between an actor and one of their movies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub actor_id: ActorId,
    pub movie_id: MovieId,
    pub billing_order: u32,
}

/// Aggregate numbers about the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub actors: usize,
    pub movies: usize,
    pub actors_with_movies: usize,
    pub appearances: usize,
}

// =============================================================================
// CatalogIndex - The In-Memory Catalog
// =============================================================================

/// Holds every admitted actor, every curated movie and the links between them.
///
/// Lookups by id are O(1); actor lookups by name go through a lowercase
/// name index.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    pub(crate) actors: HashMap<ActorId, ActorRecord>,
    pub(crate) movies: HashMap<MovieId, CuratedMovie>,
    /// Appearances per actor, in insertion order
    pub(crate) appearances: HashMap<ActorId, Vec<Appearance>>,
    /// Lowercased actor name to id
    pub(crate) name_index: HashMap<String, ActorId>,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_actor(&self, id: ActorId) -> Option<&ActorRecord> {
        self.actors.get(&id)
    }

    /// Case-insensitive lookup by display name
    pub fn get_actor_by_name(&self, name: &str) -> Option<&ActorRecord> {
        self.name_index
            .get(&normalize_name(name))
            .and_then(|id| self.actors.get(id))
    }

    pub fn get_movie(&self, id: MovieId) -> Option<&CuratedMovie> {
        self.movies.get(&id)
    }

    /// Appearances of an actor; empty slice when unknown
    pub fn get_appearances(&self, actor_id: ActorId) -> &[Appearance] {
        self.appearances
            .get(&actor_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All actor ids in ascending order
    pub fn actor_ids(&self) -> Vec<ActorId> {
        let mut ids: Vec<ActorId> = self.actors.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// All movie ids in ascending order
    pub fn movie_ids(&self) -> Vec<MovieId> {
        let mut ids: Vec<MovieId> = self.movies.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Insert or replace an actor
    pub fn insert_actor(&mut self, actor: ActorRecord) {
        if let Some(previous) = self.actors.get(&actor.id) {
            self.name_index.remove(&normalize_name(&previous.name));
        }
        self.name_index.insert(normalize_name(&actor.name), actor.id);
        self.actors.insert(actor.id, actor);
    }

    /// Insert or replace a movie
    pub fn insert_movie(&mut self, movie: CuratedMovie) {
        self.movies.insert(movie.id, movie);
    }

    /// Insert a movie only if the id is not already known.
    ///
    /// Returns `true` when the movie was added.
    pub fn insert_movie_if_absent(&mut self, movie: CuratedMovie) -> bool {
        if self.movies.contains_key(&movie.id) {
            return false;
        }
        self.movies.insert(movie.id, movie);
        true
    }

    /// Link an actor to a movie. A second link to the same movie is ignored.
    pub fn insert_appearance(&mut self, appearance: Appearance) {
        let list = self.appearances.entry(appearance.actor_id).or_default();
        if !list.iter().any(|a| a.movie_id == appearance.movie_id) {
            list.push(appearance);
        }
    }

    /// Remove an actor and their appearances. Movies stay in the catalog.
    pub fn remove_actor(&mut self, id: ActorId) -> Option<ActorRecord> {
        let actor = self.actors.remove(&id)?;
        self.name_index.remove(&normalize_name(&actor.name));
        self.appearances.remove(&id);
        Some(actor)
    }

    /// Get counts for debugging/validation: (actors, movies, appearances)
    pub fn counts(&self) -> (usize, usize, usize) {
        let total_appearances = self.appearances.values().map(|v| v.len()).sum();
        (self.actors.len(), self.movies.len(), total_appearances)
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
