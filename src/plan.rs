//! File plan builder — expands a (year, months) request into the expected
//! remote/local file pairs, one per calendar day.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// One (remote file, local file) pair for a single calendar day.
///
/// Immutable after construction. `rel_path` is the archive-relative form
/// shared by both sides and is the identifier reported in the run summary.
#[derive(Debug, Clone)]
pub struct DownloadTarget {
    pub remote_url: String,
    pub local_path: PathBuf,
    pub rel_path: String,
    pub year: String,
    pub month: String,
    pub day: String,
}

/// Number of days in a (year, month), with standard leap-year rules.
pub fn days_in_month(year: &str, month: &str) -> Result<u32> {
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid year token {:?}", year))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("Invalid month token {:?}", month))?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("No such calendar month: {}-{:02}", year, month))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .context("Calendar overflow computing month length")?;
    Ok(next.signed_duration_since(first).num_days() as u32)
}

/// Enumerate the expected targets for `year` across `months`, creating the
/// local directory for each (year, month) before returning its targets.
///
/// The remote directory is `cmorph_v1.0/...` while the local tree uses only
/// `v1.0/...`: the `cmorph` level already exists in the local data root.
pub fn build_plan(
    year: &str,
    months: &[String],
    data_dir: &Path,
    base_url: &str,
) -> Result<Vec<DownloadTarget>> {
    let mut plan = Vec::new();
    for month in months {
        let month_dir = data_dir
            .join("v1.0")
            .join("30min")
            .join("8km")
            .join(year)
            .join(month);
        std::fs::create_dir_all(&month_dir)
            .with_context(|| format!("Failed to create {}", month_dir.display()))?;

        let last_day = days_in_month(year, month)?;
        for day in 1..=last_day {
            let day = format!("{:02}", day);
            let rel_path = format!(
                "v1.0/30min/8km/{year}/{month}/CMORPH_V1.0_ADJ_8km-30min_{year}{month}{day}00.nc"
            );
            plan.push(DownloadTarget {
                remote_url: format!("{}cmorph_{}", base_url, rel_path),
                local_path: month_dir.join(format!(
                    "CMORPH_V1.0_ADJ_8km-30min_{year}{month}{day}00.nc"
                )),
                rel_path,
                year: year.to_string(),
                month: month.clone(),
                day,
            });
        }
    }
    Ok(plan)
}
