//! Error types for the ingestion crate.

use thiserror::Error;

/// Errors that can occur during ingestion.
#[derive(Error, Debug)]
pub enum IngestionError {
    /// The download failed: connection error, non-2xx status, or the body
    /// stream broke part way through.
    #[error("Transfer failed for {url}: {message}")]
    Transfer {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// A CSV row (or the header) could not be parsed.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse { line: Option<u64>, message: String },

    /// The header row is unusable, so no row can be decoded.
    #[error("Invalid CSV header: {0}")]
    InvalidHeader(String),

    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Ingestion task failed: {0}")]
    Task(String),
}

impl IngestionError {
    /// Wrap a reqwest failure for `url`, keeping the status code if there is one.
    pub fn transfer(url: &str, err: &reqwest::Error) -> Self {
        IngestionError::Transfer {
            url: url.to_string(),
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    /// Convert a csv error.
    ///
    /// I/O errors surface from the body stream underneath the reader, so they
    /// are transfer failures rather than bad rows.
    pub fn from_csv(err: csv::Error, url: &str) -> Self {
        let line = err.position().map(|p| p.line());
        if err.is_io_error() {
            return IngestionError::Transfer {
                url: url.to_string(),
                status: None,
                message: err.to_string(),
            };
        }
        IngestionError::Parse {
            line,
            message: err.to_string(),
        }
    }

    /// True when the error ends the ingestion pass.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, IngestionError::Parse { .. })
    }

    /// HTTP status reported by the remote, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            IngestionError::Transfer { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
