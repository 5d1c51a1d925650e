//! Persistence for sheet documents.
//!
//! This crate reads and writes the XML document formats and loads tool
//! configuration:
//! - Modifier lists (`<modifier_list>`, current version 1)
//! - Advantage lists (`<advantage_list>`, current version 2)
//! - Sheet configuration (TOML)
//!
//! Documents are built with `sheet-core` types directly; the codec never goes
//! through the notifying editors.

pub mod codec;
pub mod error;
pub mod loaders;
mod xml;

pub use codec::{
    Diagnostic, LoadReport, LoadState, load_document, load_document_with_strings, save_document,
    save_to_string,
};
pub use error::{CodecError, CodecResult};
pub use loaders::{ConfigLoader, DocumentLoader, LoadResult};
