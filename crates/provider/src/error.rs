//! Error types for metadata provider calls.

use thiserror::Error;

/// Errors a metadata provider call can fail with
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The person or movie does not exist upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limiting, upstream outage or a similar retryable condition
    #[error("Transient provider failure: {0}")]
    Transient(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    /// Whether retrying the same call later could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Transient(_) => true,
            ProviderError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }

    /// Classify an HTTP status from the upstream API
    pub fn from_status(status: u16, url: &str) -> Self {
        match status {
            404 => ProviderError::NotFound(url.to_string()),
            429 | 500..=599 => ProviderError::Transient(format!("status {} from {}", status, url)),
            _ => ProviderError::Status {
                status,
                url: url.to_string(),
            },
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ProviderError>;
