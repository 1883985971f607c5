// Utility helpers for the scanner web backend.
// Translation lookup, static asset provisioning and temp directory cleanup.

pub mod assets;
pub mod config;
pub mod error;
pub mod i18n;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
