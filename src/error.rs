//! Error types for change resolution.
//!
//! Defines [`ModscopeError`], the error type for every stage of a run.
//! Messages are written for the developer at the terminal: each variant says
//! what went wrong and, where there is one, how to fix it. All variants are
//! fatal; out-of-convention paths are reported as ignored, not as errors.

use std::fmt;
use std::path::PathBuf;

use modscope_git::GitError;

// ---------------------------------------------------------------------------
// ModscopeError
// ---------------------------------------------------------------------------

/// Error type for a change-resolution run.
#[derive(Debug)]
pub enum ModscopeError {
    /// Required location or setting is missing or malformed.
    Configuration {
        /// Human-readable description of the problem.
        detail: String,
    },

    /// No build-info record exists, so there is no previous build to compare
    /// against.
    BuildInfoMissing {
        /// Where the record was expected.
        path: PathBuf,
        /// The full-build command to run instead.
        full_build: String,
    },

    /// A commit identifier is neither abbreviated nor full length, or is not
    /// hex.
    InvalidReference {
        /// The identifier as given.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The repository has no commit matching the reference.
    ReferenceNotFound {
        /// The identifier as given.
        reference: String,
        /// Backend details.
        detail: String,
    },

    /// An abbreviated reference matched more than one object.
    AmbiguousReference {
        /// The identifier as given.
        reference: String,
    },

    /// A path follows the source-marker convention but its module root has
    /// no descriptor.
    FilesystemInconsistency {
        /// The changed path that led here.
        path: String,
        /// The directory expected to hold the descriptor.
        module_root: PathBuf,
        /// The descriptor file name that was looked for.
        descriptor: String,
    },

    /// A module descriptor could not be read or has no identifier.
    Descriptor {
        /// Path to the descriptor file.
        path: PathBuf,
        /// Human-readable description of the problem.
        detail: String,
    },

    /// Any other git backend failure.
    Git(GitError),

    /// A filesystem operation failed.
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

impl ModscopeError {
    /// Shorthand for [`ModscopeError::Configuration`].
    pub fn configuration(detail: impl Into<String>) -> Self {
        Self::Configuration {
            detail: detail.into(),
        }
    }

    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for ModscopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { detail } => {
                write!(f, "configuration error: {detail}")
            }
            Self::BuildInfoMissing { path, full_build } => {
                write!(
                    f,
                    "no previous build found (missing {}).\n  To fix: run a full build first:\n    {full_build}",
                    path.display()
                )
            }
            Self::InvalidReference { value, reason } => {
                write!(
                    f,
                    "commit [{value}] is an invalid commit: {reason}\n  Commit references must be 7 (abbreviated) or 40 (full) hex characters."
                )
            }
            Self::ReferenceNotFound { reference, detail } => {
                write!(
                    f,
                    "commit [{reference}] not found: {detail}\n  To fix: fetch the missing history, or rebuild fully to record a new build commit."
                )
            }
            Self::AmbiguousReference { reference } => {
                write!(
                    f,
                    "commit [{reference}] is ambiguous: more than one object starts with it.\n  To fix: pass the full 40-character id with --since."
                )
            }
            Self::FilesystemInconsistency {
                path,
                module_root,
                descriptor,
            } => {
                write!(
                    f,
                    "'{path}' is under a module source directory, but {} has no {descriptor}",
                    module_root.display()
                )
            }
            Self::Descriptor { path, detail } => {
                write!(f, "cannot read module descriptor {}: {detail}", path.display())
            }
            Self::Git(e) => write!(f, "{e}"),
            Self::Io { path, source } => {
                write!(f, "I/O error on {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ModscopeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Git(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<GitError> for ModscopeError {
    fn from(e: GitError) -> Self {
        Self::Git(e)
    }
}
