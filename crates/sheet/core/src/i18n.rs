//! Localized-string provider interface.
//!
//! The document model never owns a string table. Default row names and display
//! fragments are looked up through a [`StringProvider`] injected when the
//! [`Document`](crate::Document) is constructed, so tests and tools can run
//! with [`DefaultStrings`] while an application plugs in its own tables.

use std::borrow::Cow;
use std::collections::HashMap;

/// Lookup keys used by the core. The key doubles as the English text.
pub mod keys {
    pub const MODIFIER: &str = "Modifier";
    pub const TRAIT: &str = "Trait";
    pub const FROM_CONTAINER: &str = "** From container - not modifiable here **";
    pub const BASE_ONLY: &str = "(base only)";
    pub const LEVELS_ONLY: &str = "(levels only)";
}

/// Source of localized text.
pub trait StringProvider {
    /// Returns the localized text for `key`, or the key itself when no
    /// translation exists.
    fn text<'a>(&'a self, key: &'a str) -> Cow<'a, str>;
}

/// Provider that returns every key unchanged (English).
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultStrings;

impl StringProvider for DefaultStrings {
    fn text<'a>(&'a self, key: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(key)
    }
}

/// In-memory translation table with key fallback.
#[derive(Clone, Debug, Default)]
pub struct StringTable {
    entries: HashMap<String, String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl StringProvider for StringTable {
    fn text<'a>(&'a self, key: &'a str) -> Cow<'a, str> {
        match self.entries.get(key) {
            Some(value) => Cow::Borrowed(value.as_str()),
            None => Cow::Borrowed(key),
        }
    }
}
