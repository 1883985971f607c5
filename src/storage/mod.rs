// Local filesystem helpers.
// Atomic writes for downloaded assets, default directory layout and temp cleanup.

pub mod cleanup;
pub mod paths;
pub mod store;

pub use cleanup::{CleanupEntry, CleanupOutcome, CleanupReport, clean};
pub use store::{read_json, write_bytes};
