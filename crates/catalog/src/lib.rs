//! # Catalog Crate
//!
//! This crate holds the trivia game's local catalog: the actors admitted into
//! the game, their curated movies, and the links between them.
//!
//! ## Main Components
//!
//! - **types**: Domain types shared by the whole workspace (ids, credits,
//!   curated movies, actor candidates, `CatalogIndex`)
//! - **parser**: Read and write the `.dat` files a catalog directory is made of
//! - **index**: Load, validate, persist, upsert and prune the `CatalogIndex`
//! - **store**: The `CatalogStore` interface the game reads through
//! - **error**: Error types for catalog operations
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogIndex, CatalogStore};
//! use std::path::Path;
//!
//! let index = CatalogIndex::load_from_files(Path::new("data/catalog"))?;
//! let movies = index.actor_movies("Tom Hanks");
//! let hits = index.find_movies_by_title_substring("toy story");
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod store;
pub mod types;

pub use error::{CatalogError, Result};
pub use store::{ACTOR_MOVIES_LIMIT, CatalogStore, SEARCH_LIMIT};
pub use types::{
    ActorCandidate, ActorId, ActorRecord, Appearance, CatalogIndex, CatalogStats, CuratedMovie,
    KnownFor, LanguageCode, MediaType, MovieCredit, MovieId, release_year_from_date,
};
