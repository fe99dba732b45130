//! Error types for git operations.
//!
//! [`GitError`] is the single error type returned by all [`GitRepo`](crate::GitRepo)
//! methods. Variants are specific enough that callers can tell a missing
//! commit from an ambiguous prefix without parsing messages.

use thiserror::Error;

/// Errors returned by [`GitRepo`](crate::GitRepo) operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// A requested object, ref, or revision was not found.
    #[error("not found: {message}")]
    NotFound {
        /// Human-readable description of what was missing.
        message: String,
    },

    /// An abbreviated object id matched more than one object.
    #[error("ambiguous revision `{spec}`: {message}")]
    AmbiguousRef {
        /// The revision as given by the caller.
        spec: String,
        /// Backend details (usually the candidate list).
        message: String,
    },

    /// An OID string could not be parsed or was otherwise invalid.
    #[error("invalid OID `{value}`: {reason}")]
    InvalidOid {
        /// The raw value that failed validation.
        value: String,
        /// Why validation failed.
        reason: String,
    },

    /// An I/O error occurred while reading the repository or working tree.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The underlying git backend returned an unclassified error.
    ///
    /// The `message` should include enough context to diagnose the failure.
    #[error("git backend error: {message}")]
    BackendError {
        /// Freeform error description from the backend.
        message: String,
    },
}
