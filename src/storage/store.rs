// File store for downloaded assets and JSON data.
// Handles parent directory creation, atomic replacement and JSON decoding.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::Result;

/// Read a JSON document from a file.
/// Returns `Ok(None)` when the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let value: T = serde_json::from_str(&contents)?;
    Ok(Some(value))
}

/// Write raw bytes to a file, replacing any previous content.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // Write atomically via a sibling temp file
    let temp_path = partial_path(path);
    let mut file = fs::File::create(&temp_path)?;
    let written = file
        .write_all(bytes)
        .and_then(|()| file.sync_all())
        .and_then(|()| fs::rename(&temp_path, path));

    if let Err(e) = written {
        drop(file);
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            tracing::warn!(path = %temp_path.display(), error = %cleanup, "error removing partial file");
        }
        return Err(e.into());
    }

    Ok(())
}

/// Sibling path used while a write is in flight (`name.ext.part`).
fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}
