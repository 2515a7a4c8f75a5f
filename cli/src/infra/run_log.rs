//! File-backed `RunLog`: one append-only log file per deployment run.

use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::application::ports::{LogLevel, RunLog};

/// Log file name for a run started at `started`.
#[must_use]
pub fn log_file_name(started: &DateTime<Local>) -> String {
    format!("deploy-{}.log", started.format("%Y%m%d-%H%M%S"))
}

/// Appends timestamped lines to a per-run log file.
pub struct FileRunLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileRunLog {
    /// Create `dir/deploy-<timestamp>.log`, creating `dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn create(dir: &Path, started: &DateTime<Local>) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
        let path = dir.join(log_file_name(started));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RunLog for FileRunLog {
    fn record(&self, level: LogLevel, message: &str) {
        let line = format!(
            "{} [{}] {message}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level.label()
        );
        // A failed log write must not abort the deployment.
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(line.as_bytes());
        }
    }
}
