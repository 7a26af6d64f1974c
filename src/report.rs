//! Outcome accumulation and the end-of-run summary.

use anyhow::Result;

use crate::fetch::FetchStatus;
use crate::logfile::UpdateLog;
use crate::plan::DownloadTarget;

/// Disjoint per-run outcome buckets, accumulated monotonically.
///
/// A skipped target contributes to none of them; every other target lands in
/// exactly one.
#[derive(Debug, Default)]
pub struct OutcomeSet {
    pub updated: Vec<String>,
    pub new: Vec<String>,
    pub error: Vec<String>,
}

impl OutcomeSet {
    /// Classify one resolved target. `update` is whether the target entered
    /// update mode (a local file existed before the fetch).
    pub fn record(&mut self, target: &DownloadTarget, update: bool, status: FetchStatus) {
        match status {
            FetchStatus::Complete if update => self.updated.push(target.rel_path.clone()),
            FetchStatus::Complete => self.new.push(target.rel_path.clone()),
            FetchStatus::Incomplete => self.error.push(target.rel_path.clone()),
            FetchStatus::Skip => {}
        }
    }

    /// Emit the summary to stdout and, line for line, to the update log.
    pub fn write_summary(&self, log: &UpdateLog) -> Result<()> {
        let mut emit = |line: &str| -> Result<()> {
            println!("{}", line);
            log.info(line)
        };

        emit("── Summary ──")?;
        emit(&format!("Updated files: {}", self.updated.len()))?;
        for path in &self.updated {
            emit(&format!("  {}", path))?;
        }
        emit(&format!("New files: {}", self.new.len()))?;
        for path in &self.new {
            emit(&format!("  {}", path))?;
        }
        emit(&format!("Error files: {}", self.error.len()))?;
        for path in &self.error {
            emit(&format!("  {}", path))?;
        }
        Ok(())
    }
}
