// Internationalization for backend messages.
// Locale tables on disk, key translation and request language selection.

pub mod language;
pub mod store;
pub mod translate;

pub use language::LanguagePicker;
pub use store::{LocaleMap, LocaleStore};
pub use translate::{Lookup, Translator, substitute};

/// Language used when nothing else is configured.
pub const DEFAULT_LANGUAGE: &str = "en";
