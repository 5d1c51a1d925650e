//! Common error infrastructure for sheet-core.
//!
//! Domain-specific errors (e.g. [`TreeError`](crate::row::TreeError)) are
//! defined next to the code that produces them. This module provides the
//! shared classification used by every error type in the workspace, including
//! the codec errors in `sheet-content`.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each subsystem has its own error enum with specific variants
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **Stable Codes**: Every variant exposes a static code for logs and tests

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: The caller can fix the input and retry the same operation
/// - **Validation**: The request itself is invalid and must not be retried as-is
/// - **Internal**: Unexpected inconsistency inside the document model
/// - **Fatal**: The document cannot be used at all (e.g. a malformed file)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: index past the end of a child list
    Recoverable,

    /// Examples: moving a row beneath its own descendant, editing the wrong row kind
    Validation,

    /// Examples: a handle that no longer resolves to a row
    Internal,

    /// Examples: missing root element, document written by a newer format
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug or unusable input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all sheet errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait SheetError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
