//! Version-aware document codec.
//!
//! Row elements are dispatched by tag through an explicit decode table; tags
//! that are not in the table are skipped together with their subtree. A single
//! [`LoadState`] carries the document's declared version down to every row
//! loader so legacy spellings can be honoured.
//!
//! Malformed numbers and unknown tokens never abort a load. They fall back to
//! the field's default and are recorded in the [`LoadReport`].

mod advantage;
mod document;
mod feature;
mod modifier;

pub use document::{
    load_document, load_document_with_strings, save_document, save_to_string,
};

use std::str::FromStr;

use serde::Serialize;

use crate::xml::Element;

/// Row kinds, as found in the decode table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RowTag {
    Modifier,
    Advantage,
}

/// Tag literal → row kind.
const ROW_TAGS: &[(&str, RowTag)] = &[
    ("modifier", RowTag::Modifier),
    ("advantage", RowTag::Advantage),
];

impl RowTag {
    pub(crate) fn lookup(tag: &str) -> Option<Self> {
        ROW_TAGS
            .iter()
            .find(|(literal, _)| *literal == tag)
            .map(|(_, row_tag)| *row_tag)
    }
}

/// A non-fatal observation made while loading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A value could not be read and the field kept its default.
    FieldDefaulted {
        location: String,
        field: String,
        text: String,
    },
    /// An element was not recognised (or not allowed where it appeared) and
    /// was skipped with its subtree.
    UnknownElementSkipped { location: String, tag: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::FieldDefaulted {
                location,
                field,
                text,
            } => write!(f, "{location}: defaulted {field} (could not read {text:?})"),
            Diagnostic::UnknownElementSkipped { location, tag } => {
                write!(f, "{location}: skipped <{tag}>")
            }
        }
    }
}

/// Diagnostics collected by one load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn skipped_tags(&self) -> impl Iterator<Item = &str> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::UnknownElementSkipped { tag, .. } => Some(tag.as_str()),
            Diagnostic::FieldDefaulted { .. } => None,
        })
    }

    pub fn defaulted_fields(&self) -> impl Iterator<Item = &str> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::FieldDefaulted { field, .. } => Some(field.as_str()),
            Diagnostic::UnknownElementSkipped { .. } => None,
        })
    }
}

/// State threaded through every row loader.
#[derive(Debug)]
pub struct LoadState {
    /// Version declared on the root element (0 when absent).
    pub data_file_version: i32,
    pub report: LoadReport,
    path: Vec<String>,
}

impl LoadState {
    pub(crate) fn new(data_file_version: i32, root: &str) -> Self {
        Self {
            data_file_version,
            report: LoadReport::default(),
            path: vec![root.to_string()],
        }
    }

    /// Slash-separated path of the element being read.
    pub fn location(&self) -> String {
        self.path.iter().map(|segment| format!("/{segment}")).collect()
    }

    pub(crate) fn enter(&mut self, tag: &str) {
        self.path.push(tag.to_string());
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }

    pub(crate) fn defaulted(&mut self, field: &str, text: &str) {
        let location = self.location();
        tracing::debug!(%location, field, text, "Field defaulted");
        self.report.diagnostics.push(Diagnostic::FieldDefaulted {
            location,
            field: field.to_string(),
            text: text.to_string(),
        });
    }

    pub(crate) fn skipped(&mut self, tag: &str) {
        let location = self.location();
        tracing::debug!(%location, tag, "Skipping element");
        self.report
            .diagnostics
            .push(Diagnostic::UnknownElementSkipped {
                location,
                tag: tag.to_string(),
            });
    }

    /// Integer text of `element`, or `default` when it does not parse.
    pub(crate) fn read_int(&mut self, element: &Element, default: i32) -> i32 {
        let text = element.text.trim();
        match text.parse::<i32>() {
            Ok(value) => value,
            Err(_) => {
                self.defaulted(&element.name, text);
                default
            }
        }
    }

    /// Finite floating-point text of `element`, or `default`.
    pub(crate) fn read_f64(&mut self, element: &Element, default: f64) -> f64 {
        let text = element.text.trim();
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                self.defaulted(&element.name, text);
                default
            }
        }
    }

    /// Parse a token, falling back to `default` when unrecognised.
    pub(crate) fn read_token<T: FromStr>(&mut self, field: &str, text: &str, default: T) -> T {
        match text.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                self.defaulted(field, text);
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, text: &str) -> Element {
        Element {
            text: text.to_string(),
            ..Element::new(name)
        }
    }

    #[test]
    fn decode_table_lookup() {
        assert_eq!(RowTag::lookup("modifier"), Some(RowTag::Modifier));
        assert_eq!(RowTag::lookup("advantage"), Some(RowTag::Advantage));
        assert_eq!(RowTag::lookup("skill"), None);
    }

    #[test]
    fn numbers_fall_back_and_are_reported() {
        let mut state = LoadState::new(1, "modifier_list");
        state.enter("modifier");
        assert_eq!(state.read_int(&element("levels", " 3 "), 0), 3);
        assert_eq!(state.read_int(&element("levels", "three"), 0), 0);
        assert_eq!(state.read_f64(&element("cost", "NaN"), 1.0), 1.0);
        assert_eq!(state.read_f64(&element("cost", "2.5"), 1.0), 2.5);
        state.leave();

        assert_eq!(
            state.report.defaulted_fields().collect::<Vec<_>>(),
            vec!["levels", "cost"]
        );
        assert_eq!(
            state.report.diagnostics[0],
            Diagnostic::FieldDefaulted {
                location: "/modifier_list/modifier".to_string(),
                field: "levels".to_string(),
                text: "three".to_string(),
            }
        );
    }
}
