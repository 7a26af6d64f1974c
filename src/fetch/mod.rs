//! Fetch-and-verify engine.
//!
//! Each target moves through `planned → (skip | fetching → {complete,
//! incomplete})`. A pre-existing local file puts the target in update mode:
//! the remote `Last-Modified` is compared against the local mtime before any
//! bytes move, and an up-to-date file is skipped untouched. Completeness is
//! decided solely by comparing the final on-disk size with the declared
//! `Content-Length`; no checksum is computed and incomplete transfers are
//! not retried.

pub mod error;

use std::io::IsTerminal;
use std::path::Path;

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{HeaderMap, CONTENT_LENGTH, LAST_MODIFIED};
use tokio::io::AsyncWriteExt;

pub use self::error::FetchError;
use crate::logfile::UpdateLog;
use crate::plan::DownloadTarget;

/// Transfer granularity; progress is only displayed for files larger than
/// one chunk.
const CHUNK_SIZE: usize = 1 << 20;

/// Final state of one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Update mode only: the local copy is current, nothing was transferred.
    Skip,
    /// On-disk size equals the declared content length.
    Complete,
    /// The transfer ended with a size mismatch. Recorded, not retried.
    Incomplete,
}

/// Declared body size from the Content-Length header.
fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
}

/// Remote Last-Modified header as a UTC timestamp, if present and well
/// formed (IMF-fixdate, e.g. `Tue, 28 Jun 2022 01:02:03 GMT`).
fn remote_last_modified(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let raw = headers.get(LAST_MODIFIED)?.to_str().ok()?;
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Update-mode staleness check: true when the remote copy must be fetched.
///
/// A missing or unparsable Last-Modified header counts as stale — freshness
/// can't be proven, so the file is re-downloaded.
fn remote_is_newer(headers: &HeaderMap, local_path: &Path) -> bool {
    let remote = match remote_last_modified(headers) {
        Some(ts) => ts,
        None => return true,
    };
    let local = match std::fs::metadata(local_path).and_then(|m| m.modified()) {
        Ok(mtime) => DateTime::<Utc>::from(mtime),
        Err(_) => return true,
    };
    remote > local
}

/// Size-equality completeness check. Equality is the sole proof; a server
/// misreporting Content-Length is misclassified.
fn completeness(on_disk: u64, declared: u64) -> FetchStatus {
    if on_disk == declared {
        FetchStatus::Complete
    } else {
        FetchStatus::Incomplete
    }
}

/// Live percent-complete display for one transfer.
///
/// Hidden when stdout is not a TTY or when the whole file fits in a single
/// chunk.
fn transfer_progress(declared: u64, filename: &str) -> ProgressBar {
    if declared <= CHUNK_SIZE as u64 || !std::io::stdout().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(declared);
    pb.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%)")
            .expect("valid template")
            .progress_chars("=> "),
    );
    pb.set_message(filename.to_string());
    pb
}

/// Resolve one target against the remote archive.
///
/// `update` must be true exactly when a local file already exists at the
/// target path; a fresh target never performs the staleness probe. Network
/// and status errors propagate and abort the run — there is no per-file
/// isolation. The local file is written in place (not atomically), so an
/// interrupted run leaves a truncated file under its final name.
pub async fn fetch_target(
    client: &reqwest::Client,
    target: &DownloadTarget,
    update: bool,
    log: &UpdateLog,
) -> Result<FetchStatus, FetchError> {
    let response = client
        .get(&target.remote_url)
        .send()
        .await
        .map_err(|e| FetchError::Http {
            source: e,
            path: target.rel_path.clone(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
            path: target.rel_path.clone(),
        });
    }

    let declared = content_length(response.headers())
        .ok_or_else(|| FetchError::MissingContentLength(target.rel_path.clone()))?;

    if update && !remote_is_newer(response.headers(), &target.local_path) {
        tracing::debug!("{} is up to date, skipping", target.rel_path);
        log.debug(&format!("skip {}", target.rel_path))?;
        return Ok(FetchStatus::Skip);
    }

    tracing::debug!(
        size_bytes = declared,
        path = %target.local_path.display(),
        "fetching",
    );

    let filename = target
        .local_path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(&target.rel_path);
    let pb = transfer_progress(declared, filename);

    let mut file = tokio::fs::File::create(&target.local_path).await?;
    let mut buffer: Vec<u8> = Vec::with_capacity(CHUNK_SIZE);
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FetchError::Http {
            source: e,
            path: target.rel_path.clone(),
        })?;
        buffer.extend_from_slice(&chunk);
        while buffer.len() >= CHUNK_SIZE {
            let rest = buffer.split_off(CHUNK_SIZE);
            file.write_all(&buffer).await?;
            buffer = rest;
            // Percent-complete from what actually reached the disk.
            let written = tokio::fs::metadata(&target.local_path)
                .await
                .map(|m| m.len())
                .unwrap_or(0);
            pb.set_position(written);
        }
    }
    if !buffer.is_empty() {
        file.write_all(&buffer).await?;
    }
    file.flush().await?;
    drop(file);
    pb.finish_and_clear();

    let on_disk = tokio::fs::metadata(&target.local_path).await?.len();
    let status = completeness(on_disk, declared);
    log.debug(&format!(
        "{} {:?}: {} of {} bytes",
        target.rel_path, status, on_disk, declared
    ))?;
    Ok(status)
}
