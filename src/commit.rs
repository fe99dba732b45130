//! Commit references and tree snapshots.
//!
//! A build records the commit it was made from as a 7-character abbreviated
//! id. [`CommitResolver`] turns such a reference (or a full 40-character id)
//! into the [`TreeSnapshot`] of that commit.

use std::collections::BTreeMap;
use std::fmt;

use modscope_git::{EntryMode, GitError, GitOid, GitRepo};
use tracing::instrument;

use crate::error::ModscopeError;

/// Length of an abbreviated commit reference.
pub const ABBREV_LEN: usize = 7;

// ---------------------------------------------------------------------------
// CommitRef
// ---------------------------------------------------------------------------

/// A commit identifier in one of its two accepted forms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitRef {
    /// A 7-hex-character prefix; must be disambiguated against the repo.
    Abbreviated(String),
    /// A full object id; looked up directly.
    Full(GitOid),
}

impl CommitRef {
    /// Parse a reference, failing fast on any length other than 7 or 40 and
    /// on non-hex content.
    ///
    /// # Errors
    /// Returns [`ModscopeError::InvalidReference`].
    pub fn parse(value: &str) -> Result<Self, ModscopeError> {
        let value = value.trim();
        let invalid = |reason: String| ModscopeError::InvalidReference {
            value: value.to_owned(),
            reason,
        };
        match value.len() {
            ABBREV_LEN => {
                if value.chars().all(|c| c.is_ascii_hexdigit()) {
                    Ok(Self::Abbreviated(value.to_ascii_lowercase()))
                } else {
                    Err(invalid("not a hex string".to_owned()))
                }
            }
            GitOid::HEX_LEN => value
                .parse()
                .map(Self::Full)
                .map_err(|e: modscope_git::OidParseError| invalid(e.reason)),
            len => Err(invalid(format!(
                "expected {ABBREV_LEN} or {} characters, got {len}",
                GitOid::HEX_LEN
            ))),
        }
    }

    /// The abbreviated form, used to decide whether history changed at all.
    #[must_use]
    pub fn abbreviated(&self) -> String {
        match self {
            Self::Abbreviated(prefix) => prefix.clone(),
            Self::Full(oid) => oid.short(ABBREV_LEN),
        }
    }
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abbreviated(prefix) => f.write_str(prefix),
            Self::Full(oid) => write!(f, "{oid}"),
        }
    }
}

// ---------------------------------------------------------------------------
// TreeSnapshot
// ---------------------------------------------------------------------------

/// Mode and content id of one file in a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub mode: EntryMode,
    pub oid: GitOid,
}

/// Every file path and its content identity at one commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeSnapshot {
    commit: GitOid,
    entries: BTreeMap<String, SnapshotEntry>,
}

impl TreeSnapshot {
    /// Build a snapshot from `(path, entry)` pairs.
    pub fn new(commit: GitOid, entries: impl IntoIterator<Item = (String, SnapshotEntry)>) -> Self {
        Self {
            commit,
            entries: entries.into_iter().collect(),
        }
    }

    /// The commit this snapshot was taken from.
    #[must_use]
    pub const fn commit(&self) -> GitOid {
        self.commit
    }

    /// Entries keyed by path, in path order.
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<String, SnapshotEntry> {
        &self.entries
    }
}

// ---------------------------------------------------------------------------
// CommitResolver
// ---------------------------------------------------------------------------

/// Resolves commit references into tree snapshots.
pub struct CommitResolver<'r> {
    repo: &'r dyn GitRepo,
}

impl<'r> CommitResolver<'r> {
    pub fn new(repo: &'r dyn GitRepo) -> Self {
        Self { repo }
    }

    /// Find the single commit `reference` names.
    ///
    /// # Errors
    /// [`ModscopeError::AmbiguousReference`] if an abbreviated reference
    /// matches several objects, [`ModscopeError::ReferenceNotFound`] if no
    /// commit matches.
    pub fn commit_id(&self, reference: &CommitRef) -> Result<GitOid, ModscopeError> {
        match reference {
            CommitRef::Full(oid) => Ok(*oid),
            CommitRef::Abbreviated(prefix) => {
                self.repo
                    .rev_parse(prefix)
                    .map_err(|e| lookup_error(reference, e))
            }
        }
    }

    /// Resolve `reference` to the snapshot of its tree.
    ///
    /// # Errors
    /// See [`commit_id`](Self::commit_id); an id that is not a commit is
    /// [`ModscopeError::ReferenceNotFound`].
    #[instrument(skip(self), fields(reference = %reference))]
    pub fn resolve(&self, reference: &CommitRef) -> Result<TreeSnapshot, ModscopeError> {
        let commit = self.commit_id(reference)?;
        let tree = self
            .repo
            .commit_tree(commit)
            .map_err(|e| lookup_error(reference, e))?;
        let entries = self.repo.list_tree(tree)?;
        tracing::debug!(%commit, files = entries.len(), "resolved snapshot");
        Ok(TreeSnapshot::new(
            commit,
            entries.into_iter().map(|e| {
                (
                    e.path,
                    SnapshotEntry {
                        mode: e.mode,
                        oid: e.oid,
                    },
                )
            }),
        ))
    }
}

fn lookup_error(reference: &CommitRef, e: GitError) -> ModscopeError {
    match e {
        GitError::AmbiguousRef { .. } => ModscopeError::AmbiguousReference {
            reference: reference.to_string(),
        },
        GitError::NotFound { message } => ModscopeError::ReferenceNotFound {
            reference: reference.to_string(),
            detail: message,
        },
        other => ModscopeError::Git(other),
    }
}
