//! Eligibility screening and movie curation for the trivia catalog.
//!
//! This crate provides:
//! - Filter trait and the three eligibility rules
//! - CatalogFilter for composing the rules into one decision
//! - MovieCurator for turning an actor's credits into an AnswerSet
//! - CatalogSweep for growing the catalog from the provider's people lists
//!
//! ## Architecture
//! Actors reach the game in stages:
//! 1. The sweep collects popular actors and their credits
//! 2. The CatalogFilter keeps actors with a mostly English-language career
//! 3. The MovieCurator ranks their theatrical roles by revenue
//! 4. The result is upserted into the `CatalogIndex`
//!
//! A round in progress also uses the curator directly, to build the answer
//! set for the chosen actor.
//!
//! ## Example Usage
//! ```ignore
//! use curation::{CatalogFilter, MovieCurator, EligibilityPolicy};
//!
//! let filter = CatalogFilter::from_policy(&EligibilityPolicy::default());
//! let eligible = filter.is_eligible(&candidate, &recent_languages);
//!
//! let curator = MovieCurator::new(provider.clone());
//! let answers = curator.curate("Tom Hanks").await?;
//! ```

pub mod answer_set;
pub mod cache;
pub mod catalog_filter;
pub mod curator;
pub mod error;
pub mod filters;
pub mod policy;
pub mod sweep;
pub mod traits;

// Re-export main types
pub use answer_set::{AnswerSet, DEFAULT_ANSWER_SIZE, max_revenue};
pub use cache::{CurationCache, InMemoryCurationCache};
pub use catalog_filter::CatalogFilter;
pub use curator::{MovieCurator, RankedMovie};
pub use error::{CurationError, Result};
pub use policy::{CurationPolicy, EligibilityPolicy};
pub use sweep::{CatalogSweep, PoolSource, SweepConfig, SweepReport};
pub use traits::Filter;
