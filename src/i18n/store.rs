// Locale store.
// Loads per-language JSON string tables from a list of static roots and memoizes them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::storage::paths::{is_plain_name, locale_path};
use crate::storage::read_json;

use super::DEFAULT_LANGUAGE;

/// Translation table: key -> template string.
pub type LocaleMap = HashMap<String, String>;

/// Loads locale files and caches the result per language code.
///
/// Candidate roots are tried in order; each is expected to contain
/// `locale/{lang}.json`. A language without a readable file resolves to the
/// default language's table, and to an empty table when even that is missing.
/// Every result is cached for the lifetime of the store, misses included.
#[derive(Debug)]
pub struct LocaleStore {
    roots: Vec<PathBuf>,
    default_language: String,
    cache: RwLock<HashMap<String, Arc<LocaleMap>>>,
}

impl LocaleStore {
    /// Create a store over the given roots, falling back to `default_language`.
    pub fn new(roots: Vec<PathBuf>, default_language: impl Into<String>) -> Self {
        Self {
            roots,
            default_language: default_language.into().to_lowercase(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store that falls back to English.
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self::new(roots, DEFAULT_LANGUAGE)
    }

    /// Static roots searched for `locale/` directories, in priority order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Whether a table for `lang` has already been resolved.
    pub fn is_cached(&self, lang: &str) -> bool {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(lang)
    }

    /// Get the translation table for a language. Never fails.
    pub fn load(&self, lang: &str) -> Arc<LocaleMap> {
        if let Some(map) = self.cached(lang) {
            tracing::trace!(lang, "locale cache hit");
            return map;
        }

        let map = match self.read_first(lang) {
            Some(map) => Arc::new(map),
            None if lang != self.default_language => {
                tracing::debug!(
                    lang,
                    fallback = %self.default_language,
                    "no locale file, using default language"
                );
                self.load_default()
            }
            None => {
                tracing::warn!(lang, "no locale file for default language, translations disabled");
                Arc::new(LocaleMap::new())
            }
        };

        self.insert(lang, map)
    }

    /// Resolve the default language without recursing further.
    fn load_default(&self) -> Arc<LocaleMap> {
        let lang = self.default_language.as_str();
        if let Some(map) = self.cached(lang) {
            return map;
        }

        let map = match self.read_first(lang) {
            Some(map) => Arc::new(map),
            None => {
                tracing::warn!(lang, "no locale file for default language, translations disabled");
                Arc::new(LocaleMap::new())
            }
        };
        self.insert(lang, map)
    }

    /// Try every candidate location, returning the first that parses.
    fn read_first(&self, lang: &str) -> Option<LocaleMap> {
        if !is_plain_name(lang) {
            tracing::warn!(lang, "rejected locale name");
            return None;
        }

        self.roots
            .iter()
            .map(|root| locale_path(root, lang))
            .find_map(|path| read_locale_file(&path))
    }

    fn cached(&self, lang: &str) -> Option<Arc<LocaleMap>> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(lang)
            .cloned()
    }

    /// Store a table, keeping any entry a concurrent loader inserted first.
    fn insert(&self, lang: &str, map: Arc<LocaleMap>) -> Arc<LocaleMap> {
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        cache.entry(lang.to_string()).or_insert(map).clone()
    }
}

/// Read a single locale file, logging (not propagating) failures.
fn read_locale_file(path: &Path) -> Option<LocaleMap> {
    match read_json::<LocaleMap>(path) {
        Ok(Some(map)) => {
            tracing::debug!(path = %path.display(), keys = map.len(), "loaded locale file");
            Some(map)
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "error loading translations");
            None
        }
    }
}
