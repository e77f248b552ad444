//! Append-only error log file
//!
//! Critical migration failures are mirrored to `logs/migration-error.log`
//! under the sink's base directory as an audit trail. Writing is
//! best-effort: a sink failure is logged through the structured logger and
//! never masks the migration error that triggered it.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "migration-error.log";

/// File sink for critical migration failures
#[derive(Debug, Clone)]
pub struct ErrorLogSink {
    base_dir: PathBuf,
}

impl Default for ErrorLogSink {
    /// Sink rooted at the current working directory
    fn default() -> Self {
        Self::new(".")
    }
}

impl ErrorLogSink {
    /// Create a sink rooted at `base_dir`
    ///
    /// Records land in `<base_dir>/logs/migration-error.log`.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the log file this sink appends to
    pub fn path(&self) -> PathBuf {
        self.base_dir.join(LOG_DIR).join(LOG_FILE)
    }

    /// Append one record: a UTC timestamp line, the message, a `---` line
    ///
    /// Failures are logged at error level and swallowed.
    pub fn append(&self, message: &str) {
        if let Err(e) = self.try_append(message) {
            log::error!(
                "Failed to write to error log {}: {e}",
                self.path().display()
            );
        }
    }

    fn try_append(&self, message: &str) -> io::Result<()> {
        let dir = self.base_dir.join(LOG_DIR);
        fs::create_dir_all(&dir)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))?;

        writeln!(file, "{}", Utc::now().format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file, "{message}")?;
        writeln!(file, "---")?;
        Ok(())
    }
}
