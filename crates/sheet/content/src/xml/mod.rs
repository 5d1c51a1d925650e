//! Minimal XML element tree on top of `quick-xml`.
//!
//! Documents are small, so the reader builds the whole element tree up front
//! and the row codecs walk it. Writing streams straight to the sink.

mod reader;
mod writer;

pub(crate) use reader::parse;
pub(crate) use writer::XmlWriter;

/// A parsed element: name, attributes in document order, concatenated text,
/// and child elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }

    /// Boolean attribute: `yes`, `true`, or `1` (any case) count as set.
    pub fn is_attribute_set(&self, key: &str) -> bool {
        self.attribute(key).is_some_and(|value| {
            let value = value.trim();
            value.eq_ignore_ascii_case("yes") || value.eq_ignore_ascii_case("true") || value == "1"
        })
    }

    /// Text content with line breaks collapsed to single spaces.
    pub fn collapsed_text(&self) -> String {
        self.text.replace("\r\n", " ").replace(['\n', '\r'], " ")
    }
}
