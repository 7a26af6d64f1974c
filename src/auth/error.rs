use thiserror::Error;

/// Authentication failures. All variants are fatal: the run never proceeds
/// past a failed login.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Bad authentication: login endpoint returned HTTP {status}")]
    BadStatus { status: u16, body: String },

    #[error("Login request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
