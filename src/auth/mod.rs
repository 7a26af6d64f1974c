//! RDA session authentication.
//!
//! A single form-encoded POST to the login endpoint yields session cookies
//! that gate every subsequent file GET. The session lives for one run and is
//! never persisted.

pub mod error;

use std::sync::Arc;

pub use self::error::AuthError;

/// An authenticated cookie-bearing HTTP session.
///
/// Created once per run by [`authenticate`]; read-only afterwards. Every
/// fetch reuses the inner client so the login cookies ride along
/// automatically.
pub struct Session {
    client: reqwest::Client,
    /// Held so the jar outlives the `Arc` reference kept by the client.
    /// Not accessed directly after construction.
    #[allow(dead_code)]
    cookie_jar: Arc<reqwest::cookie::Jar>,
}

impl Session {
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

/// Submit credentials to the fixed login endpoint.
///
/// Success is exactly HTTP 200. Any other status is recorded in the update
/// log (status plus response body) and returned as [`AuthError::BadStatus`];
/// the caller decides process exit. No retry, no partial continuation.
pub async fn authenticate(
    login_url: &str,
    username: &str,
    password: &str,
    log: &crate::logfile::UpdateLog,
) -> Result<Session, AuthError> {
    let cookie_jar = Arc::new(reqwest::cookie::Jar::default());
    let client = reqwest::Client::builder()
        .cookie_provider(cookie_jar.clone())
        .build()?;

    tracing::debug!("Authenticating as {}", username);
    let response = client
        .post(login_url)
        .form(&[
            ("email", username),
            ("passwd", password),
            ("action", "login"),
        ])
        .send()
        .await?;

    let status = response.status();
    if status.as_u16() != 200 {
        let body = response.text().await.unwrap_or_default();
        log.info("Bad Authentication")?;
        log.info(&format!("HTTP {}: {}", status.as_u16(), body))?;
        return Err(AuthError::BadStatus {
            status: status.as_u16(),
            body,
        });
    }

    tracing::info!("Authenticated with {}", login_url);
    Ok(Session { client, cookie_jar })
}
