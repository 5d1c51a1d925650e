//! `@key@` placeholder handling.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::{Captures, Regex};

static NAMEABLE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([^@\n]+)@").expect("nameable key pattern is valid"));

/// Add every `@key@` placeholder in `text` to `keys`.
pub fn extract_nameables(text: &str, keys: &mut BTreeSet<String>) {
    for captures in NAMEABLE_KEY.captures_iter(text) {
        keys.insert(captures[1].to_string());
    }
}

/// Replace known `@key@` placeholders in `text`; unknown keys are kept as-is.
pub fn apply_nameables(text: &str, values: &HashMap<String, String>) -> String {
    if values.is_empty() {
        return text.to_string();
    }
    NAMEABLE_KEY
        .replace_all(text, |captures: &Captures<'_>| match values.get(&captures[1]) {
            Some(value) => Cow::Owned(value.clone()),
            None => Cow::Owned(captures[0].to_string()),
        })
        .into_owned()
}
