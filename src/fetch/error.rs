use thiserror::Error;

/// Fetch failures. None of these are retried: transport and status errors
/// abort the whole run, while a size mismatch is reported through
/// [`FetchStatus::Incomplete`](super::FetchStatus) instead of an error.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error {status} fetching {path}")]
    HttpStatus { status: u16, path: String },

    #[error("HTTP error fetching {path}: {source}")]
    Http {
        source: reqwest::Error,
        path: String,
    },

    #[error("No Content-Length header for {0}")]
    MissingContentLength(String),

    #[error("Disk error: {0}")]
    Disk(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
