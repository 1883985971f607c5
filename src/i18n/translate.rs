// Key-based translation.
// Resolves a key through the locale store and fills `{name}` placeholders.

use std::fmt::Display;
use std::sync::Arc;

use super::store::LocaleStore;

/// Outcome of looking up a key in a language's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(String),
    /// No entry for the key; carries the key itself.
    Missing(String),
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Text to render. Missing keys render as the key.
    pub fn into_text(self) -> String {
        match self {
            Lookup::Found(text) | Lookup::Missing(text) => text,
        }
    }
}

/// Translates keys using a shared [`LocaleStore`].
#[derive(Debug, Clone)]
pub struct Translator {
    store: Arc<LocaleStore>,
}

impl Translator {
    pub fn new(store: Arc<LocaleStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LocaleStore {
        &self.store
    }

    /// Look up a key without any substitution.
    pub fn lookup(&self, key: &str, lang: &str) -> Lookup {
        match self.store.load(lang).get(key) {
            Some(text) => Lookup::Found(text.clone()),
            None => {
                tracing::debug!(key, lang, "missing translation key");
                Lookup::Missing(key.to_string())
            }
        }
    }

    /// Translate a key, falling back to the key itself.
    pub fn translate(&self, key: &str, lang: &str) -> String {
        self.lookup(key, lang).into_text()
    }

    /// Translate a key and replace each `{name}` with its value.
    ///
    /// ```ignore
    /// translator.translate_with("api_scan_completed", "en", &[("count", &3)]);
    /// ```
    pub fn translate_with(
        &self,
        key: &str,
        lang: &str,
        substitutions: &[(&str, &dyn Display)],
    ) -> String {
        substitute(self.translate(key, lang), substitutions)
    }
}

/// Replace every literal `{name}` occurrence for each substitution.
pub fn substitute(mut text: String, substitutions: &[(&str, &dyn Display)]) -> String {
    for (name, value) in substitutions {
        let placeholder = format!("{{{}}}", name);
        if text.contains(&placeholder) {
            text = text.replace(&placeholder, &value.to_string());
        }
    }
    text
}
