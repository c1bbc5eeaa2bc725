//! Records returned by a metadata provider.

use catalog::{ActorId, CuratedMovie, KnownFor, LanguageCode, MovieId, release_year_from_date};
use serde::{Deserialize, Serialize};

/// How a movie was released, from most to least prominent premiere.
///
/// Ordering follows the TMDB release-type codes (1 through 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReleaseType {
    Premiere,
    TheatricalLimited,
    Theatrical,
    Digital,
    Physical,
    Tv,
}

impl ReleaseType {
    pub fn from_tmdb_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ReleaseType::Premiere),
            2 => Some(ReleaseType::TheatricalLimited),
            3 => Some(ReleaseType::Theatrical),
            4 => Some(ReleaseType::Digital),
            5 => Some(ReleaseType::Physical),
            6 => Some(ReleaseType::Tv),
            _ => None,
        }
    }
}

/// Full detail for one movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: MovieId,
    pub title: String,
    pub release_date: Option<String>,
    pub revenue: Option<u64>,
    /// Earliest release type across all regions; `None` when unreported
    pub release_type: Option<ReleaseType>,
    pub original_language: LanguageCode,
    pub poster_path: Option<String>,
}

impl MovieDetail {
    /// A movie whose only release was on television
    pub fn is_tv_release(&self) -> bool {
        self.release_type == Some(ReleaseType::Tv)
    }

    pub fn has_release_date(&self) -> bool {
        self.release_date
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }

    pub fn to_curated(&self) -> CuratedMovie {
        CuratedMovie {
            id: self.id,
            title: self.title.clone(),
            release_year: self.release_date.as_deref().and_then(release_year_from_date),
            revenue: self.revenue.unwrap_or(0),
            poster_path: self.poster_path.clone(),
        }
    }
}

/// One hit of a movie title search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSearchHit {
    pub id: MovieId,
    pub title: String,
    /// Four-digit year or "N/A"
    pub year: String,
}

impl From<&CuratedMovie> for MovieSearchHit {
    fn from(movie: &CuratedMovie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            year: movie.year_label(),
        }
    }
}

/// A person from a popular or trending list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: ActorId,
    pub name: String,
    pub popularity: f32,
    pub known_for_department: Option<String>,
    pub known_for: Vec<KnownFor>,
}

impl PersonSummary {
    pub fn is_actor(&self) -> bool {
        self.known_for_department.as_deref() == Some("Acting")
    }
}
