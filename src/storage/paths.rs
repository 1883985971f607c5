// Path utilities.
// Resolves default directories and the on-disk layout of locale files.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Application name used for platform directories.
pub const APP_NAME: &str = "backend-helpers";

/// Get the base cache directory (~/.cache/backend-helpers on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Default scratch directory for uploads and intermediate scan output.
pub fn temp_dir() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("tmp"))
}

/// Static root shipped alongside the crate sources (repository layout).
pub fn bundled_static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Path to a language's locale file under a static root.
pub fn locale_path(root: &Path, lang: &str) -> PathBuf {
    root.join("locale").join(format!("{}.json", lang))
}

/// Check that a name can be used as a single path component.
/// Rejects empty names, `..` and anything containing separators or reserved characters.
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.chars().any(|c| {
            matches!(
                c,
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'
            )
        })
}
