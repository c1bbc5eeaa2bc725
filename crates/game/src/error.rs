//! Error types for the game crate.

use crate::session::InvalidGuess;
use catalog::MovieId;
use curation::CurationError;
use provider::ProviderError;
use thiserror::Error;

/// Failures of the round-state store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt round state: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),
}

/// Coarse error classes a client can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    TransientProvider,
    /// The provider failed in a way retrying will not fix
    Provider,
    InvalidGuess,
    Storage,
    NoActiveRound,
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Actor not found: {0}")]
    ActorNotFound(String),

    #[error("Movie not found: {0}")]
    MovieNotFound(MovieId),

    #[error("No eligible actor in the catalog")]
    NoEligibleActor,

    /// The provider has no record the request depended on
    #[error("Not found upstream: {0}")]
    UpstreamNotFound(String),

    #[error("Movie provider unavailable: {0}")]
    TransientProvider(String),

    #[error("Movie provider error: {0}")]
    Provider(String),

    #[error("Invalid guess: {0}")]
    InvalidGuess(#[from] InvalidGuess),

    #[error("Round state error: {0}")]
    Storage(#[from] StorageError),

    #[error("No active round")]
    NoActiveRound,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::ActorNotFound(_)
            | GameError::MovieNotFound(_)
            | GameError::UpstreamNotFound(_)
            | GameError::NoEligibleActor => ErrorKind::NotFound,
            GameError::TransientProvider(_) => ErrorKind::TransientProvider,
            GameError::Provider(_) => ErrorKind::Provider,
            GameError::InvalidGuess(_) => ErrorKind::InvalidGuess,
            GameError::Storage(_) => ErrorKind::Storage,
            GameError::NoActiveRound => ErrorKind::NoActiveRound,
        }
    }
}

impl From<CurationError> for GameError {
    fn from(err: CurationError) -> Self {
        match err {
            CurationError::ActorNotFound(name) => GameError::ActorNotFound(name),
            CurationError::Provider(e) => e.into(),
            other @ CurationError::DetailsUnavailable { .. } => GameError::TransientProvider(other.to_string()),
        }
    }
}

impl From<ProviderError> for GameError {
    fn from(err: ProviderError) -> Self {
        if err.is_not_found() {
            GameError::UpstreamNotFound(err.to_string())
        } else if err.is_transient() {
            GameError::TransientProvider(err.to_string())
        } else {
            GameError::Provider(err.to_string())
        }
    }
}

/// Result type alias for game operations
pub type Result<T> = std::result::Result<T, GameError>;
