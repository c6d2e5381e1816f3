pub mod catalog;
pub mod completions;
pub mod packages;
pub mod reference;

use conanlock::{parse_conan_lock, Catalog};
use std::path::Path;
use tracing::debug;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_LOCK_ERROR: u8 = 2;
pub const EXIT_IO_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn load_catalog(path: &Path) -> Result<Catalog, String> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("failed to read lockfile {}: {e}", path.display()))?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    parse_conan_lock(&bytes).map_err(|e| format!("lockfile error: {e}"))
}
