//! # Provider Crate
//!
//! Access to the external movie-metadata provider.
//!
//! ## Components
//!
//! ### MetadataProvider
//! The async interface the curation pipeline and the game read through:
//! person search, movie credits, movie details, title search, and the
//! popular/trending people lists the catalog sweep starts from.
//!
//! ### TmdbClient
//! HTTP implementation against the TMDB v3 API (bearer token auth,
//! request spacing for the upstream rate limit).
//!
//! ### StaticProvider
//! In-memory implementation for tests and offline runs.
//!
//! ## Example Usage
//!
//! ```ignore
//! use provider::{MetadataProvider, TmdbClient, TmdbConfig};
//!
//! let client = TmdbClient::new(&TmdbConfig::default().with_token_from_env())?;
//! let person_id = client.search_person("Tom Hanks").await?;
//! let credits = client.movie_credits(person_id).await?;
//! ```

pub mod error;
pub mod static_provider;
pub mod tmdb;
pub mod types;

use async_trait::async_trait;
use catalog::{ActorId, MovieCredit, MovieId};

pub use error::{ProviderError, Result};
pub use static_provider::StaticProvider;
pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::{MovieDetail, MovieSearchHit, PersonSummary, ReleaseType};

/// Read-only access to the external movie catalog.
///
/// Every call may fail with a transient error; callers decide whether that
/// is fatal.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// First person search hit for a name, with their known-for titles
    async fn find_person(&self, name: &str) -> Result<PersonSummary>;

    /// Resolve a person's name to their id (first search hit)
    async fn search_person(&self, name: &str) -> Result<ActorId> {
        Ok(self.find_person(name).await?.id)
    }

    /// All cast credits of a person
    async fn movie_credits(&self, person_id: ActorId) -> Result<Vec<MovieCredit>>;

    async fn movie_detail(&self, movie_id: MovieId) -> Result<MovieDetail>;

    /// Title search, at most 10 hits
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSearchHit>>;

    /// One page of the popular-people list (pages start at 1)
    async fn popular_people(&self, page: u32) -> Result<Vec<PersonSummary>>;

    /// This week's trending people
    async fn trending_people(&self) -> Result<Vec<PersonSummary>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::LanguageCode;

    fn credit(id: MovieId, order: u32) -> MovieCredit {
        MovieCredit {
            id,
            title: format!("Movie {}", id),
            release_date: Some("2000-01-01".to_string()),
            revenue: None,
            billing_order: order,
            original_language: LanguageCode::english(),
        }
    }

    fn detail(id: MovieId, title: &str) -> MovieDetail {
        MovieDetail {
            id,
            title: title.to_string(),
            release_date: Some("1994-07-06".to_string()),
            revenue: Some(100),
            release_type: Some(ReleaseType::Theatrical),
            original_language: LanguageCode::english(),
            poster_path: None,
        }
    }

    #[tokio::test]
    async fn test_static_provider_person_lookup() {
        let provider = StaticProvider::new().with_person(31, "Tom Hanks");
        assert_eq!(provider.search_person("tom hanks").await.unwrap(), 31);
        assert!(provider.search_person("Nobody").await.unwrap_err().is_not_found());

        let person = provider.find_person("Tom Hanks").await.unwrap();
        assert_eq!(person.name, "Tom Hanks");
        assert!(person.is_actor());
    }

    #[tokio::test]
    async fn test_static_provider_credits_and_details() {
        let provider = StaticProvider::new()
            .with_credit(31, credit(13, 0))
            .with_credit(31, credit(14, 2))
            .with_detail(detail(13, "Forrest Gump"))
            .with_failing_detail(14);

        assert_eq!(provider.movie_credits(31).await.unwrap().len(), 2);
        assert!(provider.movie_credits(99).await.unwrap().is_empty());
        assert_eq!(provider.movie_detail(13).await.unwrap().title, "Forrest Gump");
        assert!(provider.movie_detail(14).await.unwrap_err().is_transient());
        assert_eq!(provider.detail_calls(), 2);
    }

    #[tokio::test]
    async fn test_static_provider_search() {
        let provider = StaticProvider::new()
            .with_detail(detail(13, "Forrest Gump"))
            .with_detail(detail(862, "Toy Story"));

        let hits = provider.search_movies("gump").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].year, "1994");
    }

    #[tokio::test]
    async fn test_static_provider_pagination() {
        let mut provider = StaticProvider::new();
        for id in 0..25 {
            provider = provider.with_popular(PersonSummary {
                id,
                name: format!("Person {}", id),
                popularity: 1.0,
                known_for_department: Some("Acting".to_string()),
                known_for: vec![],
            });
        }
        assert_eq!(provider.popular_people(1).await.unwrap().len(), 20);
        assert_eq!(provider.popular_people(2).await.unwrap().len(), 5);
        assert!(provider.popular_people(3).await.unwrap().is_empty());
    }
}
