// Static asset provisioning.
// Fetches web UI files from a GitHub raw content base into the local static directory.

pub mod client;
pub mod manifest;
pub mod sync;

pub use client::{Fetch, RawContentClient};
pub use manifest::AssetManifest;
pub use sync::{AssetOutcome, AssetReport, AssetSync, SyncMode, SyncReport};
