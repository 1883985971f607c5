// Static asset synchronization.
// Downloads missing (or all) manifest files from the raw content base and writes them locally.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::storage::write_bytes;

use super::client::Fetch;
use super::manifest::AssetManifest;

/// How the manifest is reconciled with the local filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Only fetch files that do not exist locally.
    EnsurePresent,
    /// Fetch every file, overwriting local copies.
    ForceUpdate,
}

/// What happened to a single manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AssetOutcome {
    Present,
    Downloaded { bytes: usize },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetReport {
    pub remote: String,
    pub local: PathBuf,
    #[serde(flatten)]
    pub outcome: AssetOutcome,
}

/// Structured result of a sync run.
///
/// Entries after a failure are never attempted and do not appear.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub mode: SyncMode,
    pub base_url: String,
    pub entries: Vec<AssetReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failure().is_none()
    }

    /// The entry that stopped the sync, if any.
    pub fn failure(&self) -> Option<&AssetReport> {
        self.entries
            .iter()
            .find(|e| matches!(e.outcome, AssetOutcome::Failed { .. }))
    }

    /// Number of files written during this run.
    pub fn downloaded(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, AssetOutcome::Downloaded { .. }))
            .count()
    }
}

/// Keeps local static files in step with a remote raw content base URL.
#[derive(Debug, Clone)]
pub struct AssetSync<F> {
    fetcher: F,
    base_url: String,
}

impl<F: Fetch> AssetSync<F> {
    pub fn new(fetcher: F, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Remote URL for a manifest path.
    pub fn url_for(&self, remote: &str) -> String {
        format!("{}/{}", self.base_url, remote)
    }

    /// Download missing files from the remote base.
    pub async fn ensure_present(&self, manifest: &AssetManifest) -> SyncReport {
        self.ensure_local(manifest, false).await
    }

    /// Re-download every file from the remote base.
    pub async fn update_all(&self, manifest: &AssetManifest) -> SyncReport {
        self.ensure_local(manifest, true).await
    }

    /// Reconcile the manifest with local files.
    ///
    /// With `force` unset only missing files are fetched, and nothing touches
    /// the network when every file is present. The first failed download stops
    /// the run; files written before it stay on disk.
    pub async fn ensure_local(&self, manifest: &AssetManifest, force: bool) -> SyncReport {
        let mode = if force {
            SyncMode::ForceUpdate
        } else {
            SyncMode::EnsurePresent
        };
        let mut report = SyncReport {
            mode,
            base_url: self.base_url.clone(),
            entries: Vec::with_capacity(manifest.len()),
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };

        let mut pending = Vec::new();
        for (remote, local) in manifest.iter() {
            if !force && local.exists() {
                report.entries.push(AssetReport {
                    remote: remote.to_string(),
                    local: local.to_path_buf(),
                    outcome: AssetOutcome::Present,
                });
            } else {
                pending.push((remote, local));
            }
        }

        if pending.is_empty() {
            tracing::info!("all static files present");
            report.finished_at = Utc::now();
            return report;
        }

        match mode {
            SyncMode::EnsurePresent => {
                tracing::info!(count = pending.len(), base = %self.base_url, "downloading missing static files");
            }
            SyncMode::ForceUpdate => {
                tracing::info!(count = pending.len(), base = %self.base_url, "updating all static files");
            }
        }

        for (remote, local) in pending {
            let outcome = match self.download(remote, local).await {
                Ok(bytes) => {
                    tracing::info!(remote, local = %local.display(), bytes, "saved static file");
                    AssetOutcome::Downloaded { bytes }
                }
                Err(e) => {
                    tracing::error!(remote, error = %e, "error downloading static file");
                    AssetOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            let failed = matches!(outcome, AssetOutcome::Failed { .. });
            report.entries.push(AssetReport {
                remote: remote.to_string(),
                local: local.to_path_buf(),
                outcome,
            });
            if failed {
                break;
            }
        }

        report.finished_at = Utc::now();
        if report.is_success() {
            tracing::info!(downloaded = report.downloaded(), "static files synced successfully");
        }
        report
    }

    /// Fetch one file and write it in place.
    async fn download(&self, remote: &str, local: &Path) -> Result<usize> {
        let url = self.url_for(remote);
        tracing::debug!(%url, "fetching static file");
        let body = self.fetcher.fetch(&url).await?;
        write_bytes(local, &body)?;
        Ok(body.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const BASE: &str = "https://raw.example.com/owner/repo/main";

    /// In-memory fetcher recording every requested URL.
    #[derive(Default)]
    struct FakeFetcher {
        bodies: HashMap<String, Vec<u8>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn serving(files: &[(&str, &str)]) -> Self {
            Self {
                bodies: files
                    .iter()
                    .map(|(remote, body)| (format!("{}/{}", BASE, remote), body.as_bytes().to_vec()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Fetch for &FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.calls.lock().unwrap().push(url.to_string());
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| Error::NotFound(url.to_string()))
        }
    }

    fn manifest_in(dir: &Path, remotes: &[&str]) -> AssetManifest {
        remotes
            .iter()
            .map(|remote| (remote.to_string(), dir.join(remote)))
            .collect()
    }

    #[tokio::test]
    async fn test_all_present_makes_no_requests() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = manifest_in(temp_dir.path(), &["static/js/main.js"]);
        for (_, local) in manifest.iter() {
            fs::create_dir_all(local.parent().unwrap()).unwrap();
            fs::write(local, b"local").unwrap();
        }
        let fetcher = FakeFetcher::default();
        let sync = AssetSync::new(&fetcher, BASE);

        let report = sync.ensure_present(&manifest).await;

        assert!(report.is_success());
        assert_eq!(report.downloaded(), 0);
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_downloads_only_missing() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = manifest_in(temp_dir.path(), &["static/css/style.css", "static/js/main.js"]);
        let existing = temp_dir.path().join("static/css/style.css");
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, b"local css").unwrap();
        let fetcher = FakeFetcher::serving(&[
            ("static/css/style.css", "remote css"),
            ("static/js/main.js", "remote js"),
        ]);
        let sync = AssetSync::new(&fetcher, BASE);

        let report = sync.ensure_local(&manifest, false).await;

        assert!(report.is_success());
        assert_eq!(report.mode, SyncMode::EnsurePresent);
        assert_eq!(fetcher.calls(), vec![format!("{}/static/js/main.js", BASE)]);
        assert_eq!(fs::read(&existing).unwrap(), b"local css");
        assert_eq!(
            fs::read(temp_dir.path().join("static/js/main.js")).unwrap(),
            b"remote js"
        );
    }

    #[tokio::test]
    async fn test_force_downloads_everything() {
        let temp_dir = TempDir::new().unwrap();
        let remotes = ["static/css/style.css", "static/js/main.js", "static/locale/en.json"];
        let manifest = manifest_in(temp_dir.path(), &remotes);
        let existing = temp_dir.path().join("static/css/style.css");
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, b"stale").unwrap();
        let fetcher = FakeFetcher::serving(&[
            ("static/css/style.css", "fresh"),
            ("static/js/main.js", "js"),
            ("static/locale/en.json", "{}"),
        ]);
        let sync = AssetSync::new(&fetcher, BASE);

        let report = sync.update_all(&manifest).await;

        assert!(report.is_success());
        assert_eq!(report.mode, SyncMode::ForceUpdate);
        assert_eq!(fetcher.calls().len(), remotes.len());
        assert_eq!(report.downloaded(), remotes.len());
        assert_eq!(fs::read(&existing).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn test_failure_stops_and_keeps_earlier_files() {
        let temp_dir = TempDir::new().unwrap();
        // BTreeMap order: a, b, c
        let manifest = manifest_in(temp_dir.path(), &["a.js", "b.js", "c.js"]);
        let fetcher = FakeFetcher::serving(&[("a.js", "a"), ("c.js", "c")]);
        let sync = AssetSync::new(&fetcher, BASE);

        let report = sync.ensure_local(&manifest, true).await;

        assert!(!report.is_success());
        assert_eq!(report.failure().unwrap().remote, "b.js");
        assert_eq!(fetcher.calls().len(), 2);
        assert!(temp_dir.path().join("a.js").exists());
        assert!(!temp_dir.path().join("c.js").exists());
        assert_eq!(report.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_write_failure_leaves_no_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = manifest_in(temp_dir.path(), &["static/js/main.js"]);
        let local = temp_dir.path().join("static/js/main.js");
        fs::create_dir_all(local.join("occupied")).unwrap();
        let fetcher = FakeFetcher::serving(&[("static/js/main.js", "remote js")]);
        let sync = AssetSync::new(&fetcher, BASE);

        let report = sync.ensure_local(&manifest, true).await;

        assert!(!report.is_success());
        assert_eq!(fetcher.calls().len(), 1);
        assert!(!temp_dir.path().join("static/js/main.js.part").exists());
    }

    #[test]
    fn test_url_for() {
        let fetcher = FakeFetcher::default();
        let sync = AssetSync::new(&fetcher, BASE);
        assert_eq!(
            sync.url_for("static/js/main.js"),
            "https://raw.example.com/owner/repo/main/static/js/main.js"
        );
    }
}
