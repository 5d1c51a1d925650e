//! Codec errors.

use sheet_core::{ErrorSeverity, SheetError, TreeError};

/// Errors that abort a load or save.
///
/// Recoverable oddities inside a well-formed document (bad numbers, unknown
/// elements) are not errors; they are recorded in a
/// [`LoadReport`](crate::codec::LoadReport).
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed document at {location}: {message}")]
    MalformedDocument { location: String, message: String },

    #[error("document version {found} is newer than the supported version {supported}")]
    NewerVersion { found: i32, supported: i32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("document structure rejected: {0}")]
    Tree(#[from] TreeError),
}

impl CodecError {
    pub fn malformed(location: impl Into<String>, message: impl std::fmt::Display) -> Self {
        CodecError::MalformedDocument {
            location: location.into(),
            message: message.to_string(),
        }
    }
}

impl SheetError for CodecError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MalformedDocument { .. } | Self::NewerVersion { .. } | Self::Xml(_) => {
                ErrorSeverity::Fatal
            }
            Self::Io(_) => ErrorSeverity::Recoverable,
            Self::Tree(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedDocument { .. } => "CODEC_MALFORMED_DOCUMENT",
            Self::NewerVersion { .. } => "CODEC_NEWER_VERSION",
            Self::Io(_) => "CODEC_IO",
            Self::Xml(_) => "CODEC_XML",
            Self::Tree(err) => err.error_code(),
        }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_is_fatal() {
        let err = CodecError::malformed("/", "missing root element");
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert_eq!(err.error_code(), "CODEC_MALFORMED_DOCUMENT");
        assert_eq!(
            err.to_string(),
            "malformed document at /: missing root element"
        );
    }

    #[test]
    fn newer_version_message() {
        let err = CodecError::NewerVersion {
            found: 9,
            supported: 2,
        };
        assert!(err.to_string().contains("newer"));
        assert!(!err.severity().is_recoverable());
    }
}
