// Asset manifest.
// Maps remote paths (relative to the raw content base) to local destination files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::read_json;

/// Remote relative path -> local file path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    entries: BTreeMap<String, PathBuf>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a manifest from a JSON object file (`{"static/js/main.js": "/app/static/js/main.js"}`).
    pub fn from_file(path: &Path) -> Result<Self> {
        read_json(path)?.ok_or_else(|| {
            Error::Config(format!("asset manifest not found: {}", path.display()))
        })
    }

    /// Files shipped with the web UI, stored under `static_dir`.
    pub fn default_for(static_dir: &Path) -> Self {
        [
            "js/main.js",
            "css/style.css",
            "locale/en.json",
            "locale/de.json",
        ]
        .into_iter()
        .map(|rel| (format!("static/{}", rel), static_dir.join(rel)))
        .collect()
    }

    pub fn insert(&mut self, remote: impl Into<String>, local: impl Into<PathBuf>) {
        self.entries.insert(remote.into(), local.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(remote, local)| (remote.as_str(), local.as_path()))
    }

    /// Entries whose local file does not exist.
    pub fn missing(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.iter().filter(|(_, local)| !local.exists())
    }
}

impl<R: Into<String>, L: Into<PathBuf>> FromIterator<(R, L)> for AssetManifest {
    fn from_iter<I: IntoIterator<Item = (R, L)>>(iter: I) -> Self {
        let mut manifest = Self::new();
        for (remote, local) in iter {
            manifest.insert(remote, local);
        }
        manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_entries() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("present.js");
        fs::write(&present, b"x").unwrap();

        let manifest: AssetManifest = [
            ("static/present.js", present.clone()),
            ("static/absent.js", temp_dir.path().join("absent.js")),
        ]
        .into_iter()
        .collect();

        let missing: Vec<_> = manifest.missing().map(|(remote, _)| remote).collect();
        assert_eq!(missing, vec!["static/absent.js"]);
        assert_eq!(manifest.len(), 2);
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manifest.json");
        fs::write(&path, r#"{"static/js/main.js": "/app/static/js/main.js"}"#).unwrap();

        let manifest = AssetManifest::from_file(&path).unwrap();
        let entries: Vec<_> = manifest.iter().collect();
        assert_eq!(
            entries,
            vec![("static/js/main.js", Path::new("/app/static/js/main.js"))]
        );
    }

    #[test]
    fn test_from_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = AssetManifest::from_file(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_manifest() {
        let manifest = AssetManifest::default_for(Path::new("/app/static"));
        assert!(!manifest.is_empty());
        for (remote, local) in manifest.iter() {
            assert!(remote.starts_with("static/"));
            assert!(local.starts_with("/app/static"));
        }
    }
}
