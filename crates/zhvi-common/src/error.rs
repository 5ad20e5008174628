//! Error types for the lookup service.

use thiserror::Error;

/// Result type alias using ZhviError.
pub type ZhviResult<T> = Result<T, ZhviError>;

/// Primary error type for lookup operations.
#[derive(Debug, Error)]
pub enum ZhviError {
    #[error("Invalid ZIP code: {0}")]
    InvalidRegionKey(String),

    #[error("No data found for ZIP code {0}")]
    RegionNotFound(String),

    #[error("Data is still loading")]
    NotLoaded,
}

impl ZhviError {
    /// Get the HTTP status code for this error.
    ///
    /// An unparsable key, an unknown key and a cache that has not finished
    /// loading all answer 404 so callers cannot tell them apart.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ZhviError::InvalidRegionKey(_) | ZhviError::RegionNotFound(_) | ZhviError::NotLoaded => {
                404
            }
        }
    }

    /// Message returned to API clients.
    ///
    /// Lookup misses of any kind render the same text, naming the ZIP that
    /// was asked for.
    pub fn client_message(&self, requested: &str) -> String {
        format!("No data found for ZIP code {}", requested)
    }
}
