// Process configuration.
// Reads static root, language defaults and asset source settings from the environment.

use std::env;
use std::path::PathBuf;

use crate::assets::AssetManifest;
use crate::error::{Error, Result};
use crate::i18n::{DEFAULT_LANGUAGE, LanguagePicker};
use crate::storage::paths;

/// Header tie-break order used when LANGUAGE_PRIORITY is unset.
pub const DEFAULT_LANGUAGE_PRIORITY: &str = "de,en";

/// Settings shared by the helpers.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment static root; first locale root and asset destination.
    pub static_dir: PathBuf,
    /// Default content language, lower-cased.
    pub content_language: String,
    /// Supported languages in header matching order.
    pub language_priority: Vec<String>,
    /// Raw content base the web UI files are published from; required for asset sync.
    pub github_raw_base: Option<String>,
    pub github_token: Option<String>,
    pub manifest: AssetManifest,
    /// Directory emptied by the temp cleaner.
    pub temp_dir: Option<PathBuf>,
}

impl Config {
    /// Build the configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let static_dir = var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("static"));

        let content_language = var("CONTENT_LANGUAGE")
            .map(|v| v.to_lowercase())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let priority_raw = var("LANGUAGE_PRIORITY").unwrap_or_else(|| DEFAULT_LANGUAGE_PRIORITY.to_string());
        let language_priority = LanguagePicker::new(priority_raw.split(','))
            .supported()
            .to_vec();
        if language_priority.is_empty() {
            return Err(Error::Config(format!(
                "LANGUAGE_PRIORITY has no language codes: {:?}",
                priority_raw
            )));
        }

        let github_raw_base = var("GITHUB_RAW_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .map(|base| match url::Url::parse(&base) {
                Ok(_) => Ok(base),
                Err(e) => Err(Error::Config(format!("invalid GITHUB_RAW_BASE {:?}: {}", base, e))),
            })
            .transpose()?;

        let manifest = match var("ASSET_MANIFEST") {
            Some(path) => AssetManifest::from_file(&PathBuf::from(path))?,
            None => AssetManifest::default_for(&static_dir),
        };

        let temp_dir = var("TEMP_DIR").map(PathBuf::from).or_else(paths::temp_dir);

        Ok(Self {
            static_dir,
            content_language,
            language_priority,
            github_raw_base,
            github_token: var("GITHUB_TOKEN"),
            manifest,
            temp_dir,
        })
    }

    /// Locale roots in lookup order: deployment layout, then repository layout.
    pub fn locale_roots(&self) -> Vec<PathBuf> {
        let bundled = paths::bundled_static_dir();
        let mut roots = vec![self.static_dir.clone()];
        if bundled != self.static_dir {
            roots.push(bundled);
        }
        roots
    }

    /// Asset base URL, or a configuration error when GITHUB_RAW_BASE is unset.
    pub fn raw_base(&self) -> Result<&str> {
        self.github_raw_base
            .as_deref()
            .ok_or_else(|| Error::Config("GITHUB_RAW_BASE is not set".to_string()))
    }

    pub fn language_picker(&self) -> LanguagePicker {
        LanguagePicker::new(&self.language_priority)
    }
}
