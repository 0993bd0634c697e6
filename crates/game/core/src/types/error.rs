//! Registration errors.
//!
//! Every variant aborts the registration batch that raised it. Tables
//! validate a whole batch before committing, so a failed batch leaves no
//! partial allocation behind. Severity separates content the author has to
//! fix ([`ErrorSeverity::Validation`]) from host setups that cannot take the
//! batch at all ([`ErrorSeverity::Fatal`]).

use crate::error::{ContentError, ErrorSeverity};
use crate::types::TypeSpace;

/// Errors raised while registering content.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// Proposed identifier is empty or uses characters outside `[A-Za-z0-9_]`.
    #[error("invalid {space} identifier \"{name}\": {reason}")]
    InvalidName {
        space: TypeSpace,
        name: String,
        reason: &'static str,
    },

    /// Proposed identifier matches a host built-in (case-insensitive).
    #[error("a built-in {space} synonymous with \"{name}\" already exists")]
    ReservedName { space: TypeSpace, name: String },

    /// Proposed identifier was already registered by content.
    #[error("a {space} with the identifier \"{name}\" is already registered")]
    DuplicateName { space: TypeSpace, name: String },

    /// The same content object was handed to an allocating registry twice.
    #[error("content \"{content}\" has already been allocated a type")]
    AlreadyAllocated { content: String },

    /// The value space has a fixed upper bound and the batch would cross it.
    #[error("cannot allocate {requested} {space} value(s): limit is {limit}, {used} in use")]
    CapacityExceeded {
        space: TypeSpace,
        requested: usize,
        used: usize,
        limit: u32,
    },

    /// Content is relevant to a registry but structurally invalid.
    #[error("content \"{content}\" is malformed: {reason}")]
    Malformed { content: String, reason: String },

    /// Content targets a registry the context does not know.
    #[error("content \"{content}\" targets unknown registry \"{registry}\"")]
    UnknownRegistry { content: String, registry: String },

    /// Two unlock descriptors under one type share a variant key.
    #[error("content \"{content}\" declares more than one unlock with key {key}")]
    DuplicateUnlockKey { content: String, key: i32 },
}

impl ContentError for RegistrationError {
    fn severity(&self) -> ErrorSeverity {
        use RegistrationError::*;
        match self {
            InvalidName { .. }
            | ReservedName { .. }
            | DuplicateName { .. }
            | Malformed { .. }
            | DuplicateUnlockKey { .. } => ErrorSeverity::Validation,
            AlreadyAllocated { .. } | CapacityExceeded { .. } | UnknownRegistry { .. } => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use RegistrationError::*;
        match self {
            InvalidName { .. } => "REGISTRATION_INVALID_NAME",
            ReservedName { .. } => "REGISTRATION_RESERVED_NAME",
            DuplicateName { .. } => "REGISTRATION_DUPLICATE_NAME",
            AlreadyAllocated { .. } => "REGISTRATION_ALREADY_ALLOCATED",
            CapacityExceeded { .. } => "REGISTRATION_CAPACITY_EXCEEDED",
            Malformed { .. } => "REGISTRATION_MALFORMED",
            UnknownRegistry { .. } => "REGISTRATION_UNKNOWN_REGISTRY",
            DuplicateUnlockKey { .. } => "REGISTRATION_DUPLICATE_UNLOCK_KEY",
        }
    }
}
