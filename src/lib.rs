//! cmorph-sync — mirror the CMORPH v1.0 8km-30min precipitation dataset
//! from the UCAR RDA archive onto local storage.
//!
//! One run authenticates once against the RDA login endpoint, expands a
//! (year, months) request into one expected file per calendar day, then
//! resolves each target strictly in sequence: skip when the local copy is
//! current, otherwise stream the file and verify it by size. Outcomes are
//! summarized on stdout and in a durable update log.

#![warn(clippy::all)]

pub mod auth;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod logfile;
pub mod plan;
pub mod report;

use anyhow::Result;
use chrono::Local;

use crate::config::Config;
use crate::logfile::{Level, UpdateLog};
use crate::report::OutcomeSet;

/// Execute one full synchronization run.
///
/// Fatal preconditions (unwritable log, failed login) surface as `Err`
/// before any file is touched; the caller decides process exit. A network
/// or filesystem error mid-plan also aborts, losing the classification of
/// the remaining targets. A run that resolves every target returns the
/// outcome set after writing the summary.
pub async fn run(config: &Config) -> Result<OutcomeSet> {
    let level = if config.debug {
        Level::Debug
    } else {
        Level::Info
    };
    let log = UpdateLog::open(&config.log_path, level)?;
    log.info(&format!(
        "Updated on {} by {}",
        Local::now().format("%Y-%m-%d"),
        config.operator
    ))?;

    // Login gates everything; the plan is not even constructed on failure.
    let session =
        auth::authenticate(&config.login_url, &config.username, &config.password, &log).await?;

    let plan = plan::build_plan(&config.year, &config.months, &config.data_dir, &config.base_url)?;
    tracing::info!(
        targets = plan.len(),
        year = %config.year,
        "starting synchronization"
    );

    let mut outcomes = OutcomeSet::default();
    for target in &plan {
        let update = target.local_path.exists();
        let status = fetch::fetch_target(session.client(), target, update, &log).await?;
        outcomes.record(target, update, status);
    }

    outcomes.write_summary(&log)?;
    Ok(outcomes)
}
