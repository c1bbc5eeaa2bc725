//! Movie lookups for guesses and search.
//!
//! The local catalog answers first; the metadata provider is the fallback.

use crate::error::{GameError, Result};
use catalog::{CatalogStore, CuratedMovie, MovieId};
use curation::AnswerSet;
use provider::{MetadataProvider, MovieSearchHit};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct MovieResolver {
    catalog: Arc<dyn CatalogStore>,
    provider: Arc<dyn MetadataProvider>,
}

impl MovieResolver {
    pub fn new(catalog: Arc<dyn CatalogStore>, provider: Arc<dyn MetadataProvider>) -> Self {
        Self { catalog, provider }
    }

    /// Full details of a guessed movie.
    ///
    /// ## Algorithm
    /// 1. A movie in the round's answer set resolves to the answer set's copy
    /// 2. Otherwise the local catalog
    /// 3. Otherwise the metadata provider
    ///
    /// # Returns
    /// * `Err(MovieNotFound)` - No source knows the id
    /// * `Err(TransientProvider)` - The provider lookup failed
    pub async fn resolve(&self, movie_id: MovieId, answers: &AnswerSet) -> Result<CuratedMovie> {
        if let Some(movie) = answers.get(movie_id) {
            return Ok(movie.clone());
        }
        if let Some(movie) = self.catalog.find_movie_by_id(movie_id) {
            return Ok(movie);
        }

        debug!("Movie {} not in catalog, asking provider", movie_id);
        match self.provider.movie_detail(movie_id).await {
            Ok(detail) => Ok(detail.to_curated()),
            Err(e) if e.is_not_found() => Err(GameError::MovieNotFound(movie_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Title search: catalog matches, or provider hits when the catalog has
    /// none.
    pub async fn search(&self, query: &str) -> Result<Vec<MovieSearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let local = self.catalog.find_movies_by_title_substring(query);
        if !local.is_empty() {
            return Ok(local.iter().map(MovieSearchHit::from).collect());
        }

        debug!("No catalog match for {:?}, searching provider", query);
        Ok(self.provider.search_movies(query).await?)
    }
}
