//! TMDB v3 HTTP client.
//!
//! Implements `MetadataProvider` over the public TMDB API using a v4 read
//! access token (bearer auth). Requests are spaced at least
//! `request_delay_ms` apart to stay under the upstream rate limit.

use crate::error::{ProviderError, Result};
use crate::types::{MovieDetail, MovieSearchHit, PersonSummary, ReleaseType};
use crate::MetadataProvider;
use async_trait::async_trait;
use catalog::{ActorId, KnownFor, LanguageCode, MediaType, MovieCredit, MovieId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const TOKEN_ENV_VAR: &str = "TMDB_TOKEN";

/// Number of hits `search_movies` returns
const SEARCH_RESULT_LIMIT: usize = 10;

/// Billing order assumed when TMDB omits `order`
const UNKNOWN_BILLING_ORDER: u32 = 999;

/// Connection settings for the TMDB API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub base_url: String,
    /// Never read from config files; see `with_token_from_env`
    #[serde(skip)]
    pub access_token: Option<String>,
    pub request_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            request_delay_ms: 250,
            timeout_secs: 10,
        }
    }
}

impl TmdbConfig {
    /// Fill `access_token` from the `TMDB_TOKEN` environment variable
    pub fn with_token_from_env(mut self) -> Self {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.trim().is_empty() {
                self.access_token = Some(token.trim().to_string());
            }
        }
        self
    }
}

/// HTTP client for TMDB
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    request_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let access_token = config.access_token.clone().ok_or_else(|| {
            ProviderError::Config(format!(
                "TMDB access token is required. Set {} in the environment.",
                TOKEN_ENV_VAR
            ))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token,
            request_delay: Duration::from_millis(config.request_delay_ms),
            last_request: Mutex::new(None),
        })
    }

    /// Wait until at least `request_delay` has passed since the last request
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.request_delay;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.throttle().await;

        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .header("Content-Type", "application/json;charset=utf-8")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), &url));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    #[instrument(skip(self))]
    async fn find_person(&self, name: &str) -> Result<PersonSummary> {
        let page: Page<PersonDto> = self
            .get_json("/search/person", &[("query", name.to_string())])
            .await?;

        page.results
            .into_iter()
            .next()
            .map(PersonDto::into_summary)
            .ok_or_else(|| ProviderError::NotFound(format!("No results found for actor: {}", name)))
    }

    #[instrument(skip(self))]
    async fn movie_credits(&self, person_id: ActorId) -> Result<Vec<MovieCredit>> {
        let credits: CreditsDto = self
            .get_json(&format!("/person/{}/movie_credits", person_id), &[])
            .await?;

        Ok(credits.cast.into_iter().map(CastDto::into_credit).collect())
    }

    #[instrument(skip(self))]
    async fn movie_detail(&self, movie_id: MovieId) -> Result<MovieDetail> {
        let detail: MovieDetailDto = self
            .get_json(
                &format!("/movie/{}", movie_id),
                &[("append_to_response", "release_dates".to_string())],
            )
            .await?;

        Ok(detail.into_detail())
    }

    #[instrument(skip(self))]
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSearchHit>> {
        let page: Page<MovieSearchDto> = self
            .get_json(
                "/search/movie",
                &[
                    ("query", query.to_string()),
                    ("include_adult", "false".to_string()),
                    ("page", "1".to_string()),
                ],
            )
            .await?;

        Ok(page
            .results
            .into_iter()
            .take(SEARCH_RESULT_LIMIT)
            .map(|m| MovieSearchHit {
                id: m.id,
                year: m
                    .release_date
                    .as_deref()
                    .and_then(catalog::release_year_from_date)
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
                title: m.title,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn popular_people(&self, page: u32) -> Result<Vec<PersonSummary>> {
        let page: Page<PersonDto> = self
            .get_json("/person/popular", &[("page", page.to_string())])
            .await?;
        Ok(page.results.into_iter().map(PersonDto::into_summary).collect())
    }

    #[instrument(skip(self))]
    async fn trending_people(&self) -> Result<Vec<PersonSummary>> {
        let page: Page<PersonDto> = self.get_json("/trending/person/week", &[]).await?;
        Ok(page.results.into_iter().map(PersonDto::into_summary).collect())
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct PersonDto {
    id: ActorId,
    name: String,
    #[serde(default)]
    popularity: f32,
    known_for_department: Option<String>,
    #[serde(default)]
    known_for: Vec<KnownForDto>,
}

impl PersonDto {
    fn into_summary(self) -> PersonSummary {
        PersonSummary {
            id: self.id,
            name: self.name,
            popularity: self.popularity,
            known_for_department: self.known_for_department,
            known_for: self.known_for.into_iter().filter_map(KnownForDto::into_known_for).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct KnownForDto {
    title: Option<String>,
    name: Option<String>,
    media_type: Option<String>,
    original_language: Option<String>,
}

impl KnownForDto {
    fn into_known_for(self) -> Option<KnownFor> {
        let media_type = match self.media_type.as_deref() {
            Some("movie") => MediaType::Movie,
            Some("tv") => MediaType::Tv,
            _ => return None,
        };
        Some(KnownFor {
            title: self.title.or(self.name).unwrap_or_default(),
            media_type,
            original_language: LanguageCode::new(self.original_language.unwrap_or_default()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CreditsDto {
    #[serde(default)]
    cast: Vec<CastDto>,
}

#[derive(Debug, Deserialize)]
struct CastDto {
    id: MovieId,
    #[serde(default)]
    title: String,
    release_date: Option<String>,
    order: Option<u32>,
    original_language: Option<String>,
}

impl CastDto {
    fn into_credit(self) -> MovieCredit {
        MovieCredit {
            id: self.id,
            title: self.title,
            release_date: self.release_date.filter(|d| !d.trim().is_empty()),
            revenue: None,
            billing_order: self.order.unwrap_or(UNKNOWN_BILLING_ORDER),
            original_language: LanguageCode::new(self.original_language.unwrap_or_default()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MovieDetailDto {
    id: MovieId,
    title: String,
    release_date: Option<String>,
    revenue: Option<u64>,
    original_language: Option<String>,
    poster_path: Option<String>,
    release_dates: Option<ReleaseDatesDto>,
}

impl MovieDetailDto {
    fn into_detail(self) -> MovieDetail {
        let release_type = self
            .release_dates
            .iter()
            .flat_map(|r| r.results.iter())
            .flat_map(|country| country.release_dates.iter())
            .filter_map(|d| ReleaseType::from_tmdb_code(d.release_type))
            .min();

        MovieDetail {
            id: self.id,
            title: self.title,
            release_date: self.release_date.filter(|d| !d.trim().is_empty()),
            revenue: self.revenue,
            release_type,
            original_language: LanguageCode::new(self.original_language.unwrap_or_default()),
            poster_path: self.poster_path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReleaseDatesDto {
    #[serde(default)]
    results: Vec<CountryReleasesDto>,
}

#[derive(Debug, Deserialize)]
struct CountryReleasesDto {
    #[serde(default)]
    release_dates: Vec<ReleaseDateDto>,
}

#[derive(Debug, Deserialize)]
struct ReleaseDateDto {
    #[serde(rename = "type")]
    release_type: u8,
}

#[derive(Debug, Deserialize)]
struct MovieSearchDto {
    id: MovieId,
    title: String,
    release_date: Option<String>,
}
