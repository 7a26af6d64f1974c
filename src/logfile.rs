//! Durable append-only update log.
//!
//! One line per recorded action, timestamped, at `{root}/cmorph/code/
//! update_log.txt`. The handle is opened once at startup and passed
//! explicitly to the components that write provenance; there is no global
//! logger state. Console diagnostics go through `tracing` separately.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Debug,
}

/// Append-only log sink with a severity threshold.
///
/// Writes are flushed per line so the log survives an aborted run up to the
/// last completed action. An unwritable sink is a fatal error.
pub struct UpdateLog {
    file: Mutex<File>,
    level: Level,
}

impl UpdateLog {
    /// Open (creating parent directories and the file as needed) in append
    /// mode.
    pub fn open(path: &Path, level: Level) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open update log {}", path.display()))?;
        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }

    pub fn info(&self, message: &str) -> Result<()> {
        self.write(Level::Info, message)
    }

    /// Written only when the log was opened at debug level.
    pub fn debug(&self, message: &str) -> Result<()> {
        if self.level == Level::Debug {
            self.write(Level::Debug, message)?;
        }
        Ok(())
    }

    fn write(&self, level: Level, message: &str) -> Result<()> {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let tag = match level {
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        };
        let mut file = self.file.lock().expect("log mutex poisoned");
        writeln!(file, "{} {} {}", stamp, tag, message).context("Failed to write update log")?;
        file.flush().context("Failed to flush update log")?;
        Ok(())
    }
}
