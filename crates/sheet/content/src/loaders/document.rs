//! Document file loader.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;
use sheet_core::{DefaultStrings, Document, SheetConfig, StringProvider};

use crate::codec::{self, LoadReport};
use crate::loaders::{LoadResult, read_file};

/// Reads and writes document files.
pub struct DocumentLoader {
    strings: Rc<dyn StringProvider>,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::with_strings(Rc::new(DefaultStrings))
    }

    pub fn with_strings(strings: Rc<dyn StringProvider>) -> Self {
        Self { strings }
    }

    /// Load a document file.
    pub fn load(&self, path: &Path) -> LoadResult<(Document, LoadReport)> {
        let content = read_file(path)?;
        codec::load_document_with_strings(&content, Rc::clone(&self.strings))
            .with_context(|| format!("Failed to load document {}", path.display()))
    }

    /// Save a document file at the current schema version.
    ///
    /// The document is serialized in memory, written to a sibling temp file,
    /// then renamed over `path`, so a failed save never truncates the target.
    pub fn save(&self, doc: &mut Document, path: &Path, config: &SheetConfig) -> LoadResult<()> {
        let bytes = codec::save_document(doc, Vec::new(), config)
            .with_context(|| format!("Failed to save document {}", path.display()))?;

        let temp_path = temp_path(path);
        if let Err(e) = fs::write(&temp_path, bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(e).with_context(|| format!("Failed to write {}", temp_path.display()));
        }

        // Atomic rename
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e).with_context(|| format!("Failed to replace {}", path.display()));
        }

        tracing::debug!("Saved document to {}", path.display());
        Ok(())
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// `traits.adq` → `traits.adq.tmp`, in the same directory.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("document"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_file_sits_next_to_target() {
        assert_eq!(
            temp_path(Path::new("/data/traits.adq")),
            PathBuf::from("/data/traits.adq.tmp")
        );
    }
}
