//! File loaders for configuration and documents.
//!
//! These wrap the codec with path handling and `anyhow` context for tools.

pub mod config;
pub mod document;

pub use config::ConfigLoader;
pub use document::DocumentLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
