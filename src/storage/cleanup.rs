// Temp directory cleanup.
// Removes every direct child of a directory, collecting per-entry outcomes instead of failing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of removing a single directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CleanupOutcome {
    Removed,
    Failed { error: String },
}

/// A direct child of the cleaned directory and what happened to it.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupEntry {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: CleanupOutcome,
}

/// Structured report of a cleanup run.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub directory: PathBuf,
    /// The directory did not exist, nothing was attempted.
    pub was_missing: bool,
    /// Errors from inspecting or listing the directory itself, in order.
    pub list_errors: Vec<String>,
    pub entries: Vec<CleanupEntry>,
    pub finished_at: DateTime<Utc>,
}

impl CleanupReport {
    fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            was_missing: false,
            list_errors: Vec::new(),
            entries: Vec::new(),
            finished_at: Utc::now(),
        }
    }

    /// Number of entries successfully removed.
    pub fn removed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == CleanupOutcome::Removed)
            .count()
    }

    /// Entries that could not be removed.
    pub fn failures(&self) -> impl Iterator<Item = &CleanupEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, CleanupOutcome::Failed { .. }))
    }

    /// True when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.list_errors.is_empty() && self.failures().next().is_none()
    }
}

/// Remove all entries directly under `dir`, leaving `dir` itself in place.
///
/// Files and symlinks are unlinked (a symlink to a directory is never followed),
/// directories are removed recursively. Failures are logged and recorded in the
/// report; this never returns an error.
pub fn clean(dir: &Path) -> CleanupReport {
    let mut report = CleanupReport::new(dir);

    match fs::symlink_metadata(dir) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "temp directory does not exist, nothing to clean");
            report.was_missing = true;
            return report;
        }
        Err(e) => {
            tracing::error!(dir = %dir.display(), error = %e, "error inspecting temp directory");
            report.list_errors.push(e.to_string());
            report.finished_at = Utc::now();
            return report;
        }
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!(dir = %dir.display(), error = %e, "error listing temp directory");
            report.list_errors.push(e.to_string());
            report.finished_at = Utc::now();
            return report;
        }
    };

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                tracing::error!(dir = %dir.display(), error = %e, "error reading temp directory entry");
                report.list_errors.push(e.to_string());
                continue;
            }
        };

        let outcome = match remove_entry(&path) {
            Ok(()) => CleanupOutcome::Removed,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "error deleting temp entry");
                CleanupOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        report.entries.push(CleanupEntry { path, outcome });
    }

    report.finished_at = Utc::now();
    tracing::info!(
        dir = %dir.display(),
        removed = report.removed(),
        failed = report.failures().count(),
        "cleaned up temp directory"
    );
    report
}

/// Delete a single path without following symlinks.
fn remove_entry(path: &Path) -> io::Result<()> {
    let file_type = fs::symlink_metadata(path)?.file_type();
    if file_type.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
