//! Common error infrastructure for game-core.
//!
//! Domain-specific errors live next to the values they validate:
//! [`RegistrationError`](crate::RegistrationError) with the type tables,
//! [`CodecError`](crate::CodecError) and [`PayloadError`](crate::PayloadError)
//! with the entity record codec. This module provides the classification
//! shared by all of them.

/// Severity level of an error, used to choose between aborting and skipping.
///
/// - **Recoverable**: the single operation failed; log it and substitute a safe default
/// - **Validation**: invalid input from content authors, rejected without retry
/// - **Fatal**: the host setup cannot take the batch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - skip the entity, keep running.
    ///
    /// Examples: unknown type tag in a save string, corrupt coordinate
    Recoverable,

    /// Validation error - caller passed something malformed.
    ///
    /// Examples: payload containing the record delimiter, reserved-name
    /// collision, duplicate identifier
    Validation,

    /// Fatal error - the host setup cannot take the batch at all.
    ///
    /// Examples: exhausted value space, unknown registry
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if the host setup, not the content, is at fault.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait ContentError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
