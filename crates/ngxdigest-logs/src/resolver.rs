//! Log source selection between the current log and its `.1` rotation

use ngxdigest_core::constants::{log_path, rotated_log_path};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Locates the error log of a project inside the logs directory
#[derive(Debug, Clone)]
pub struct LogSource {
    logs_dir: PathBuf,
    suffix: String,
}

impl LogSource {
    pub fn new(logs_dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            suffix: suffix.into(),
        }
    }

    /// Canonical log path for a project
    pub fn current_path(&self, project: &str) -> PathBuf {
        log_path(&self.logs_dir, project, &self.suffix)
    }

    /// One-generation-back rotation of the canonical path
    pub fn rotated_path(&self, project: &str) -> PathBuf {
        rotated_log_path(&self.current_path(project))
    }

    /// Pick the file to read: the current log if it is a non-empty file,
    /// else the rotated log under the same condition, else `None`.
    pub fn resolve(&self, project: &str) -> Option<PathBuf> {
        let current = self.current_path(project);
        if is_eligible(&current) {
            debug!("{}: reading {}", project, current.display());
            return Some(current);
        }

        let rotated = rotated_log_path(&current);
        if is_eligible(&rotated) {
            debug!("{}: current log empty or missing, reading {}", project, rotated.display());
            return Some(rotated);
        }

        debug!("{}: no non-empty log under {}", project, self.logs_dir.display());
        None
    }
}

/// Existing regular file with nonzero size
fn is_eligible(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}
