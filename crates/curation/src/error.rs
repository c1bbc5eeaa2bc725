//! Error types for the curation crate.

use provider::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CurationError {
    /// The provider has no person by that name
    #[error("Actor not found: {0}")]
    ActorNotFound(String),

    /// Every movie-detail lookup for the actor failed
    #[error("Could not fetch any movie details for {actor} ({failed} lookups failed): {last_error}")]
    DetailsUnavailable {
        actor: String,
        failed: usize,
        last_error: String,
    },

    /// Person search or credit lookup failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl CurationError {
    /// Whether retrying later may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            CurationError::ActorNotFound(_) => false,
            CurationError::DetailsUnavailable { .. } => true,
            CurationError::Provider(e) => e.is_transient(),
        }
    }
}

/// Result type alias for curation operations
pub type Result<T> = std::result::Result<T, CurationError>;
