//! Core types for the modscope git layer.
//!
//! These types form the vocabulary shared between the [`GitRepo`](crate::GitRepo)
//! trait and the resolution engine. They contain no gix types; the backend
//! is an implementation detail.

use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// GitOid
// ---------------------------------------------------------------------------

/// A git object identifier (SHA-1, 20 bytes).
///
/// Stored as raw bytes for cheap comparison, hashing, and Copy semantics.
/// Displays as 40 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GitOid([u8; 20]);

impl GitOid {
    /// Number of hex characters in a full object id.
    pub const HEX_LEN: usize = 40;

    /// Create a `GitOid` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Return the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The first `len` hex characters of this id (clamped to 40).
    #[must_use]
    pub fn short(&self, len: usize) -> String {
        let mut hex = self.to_string();
        hex.truncate(len.min(Self::HEX_LEN));
        hex
    }

    /// `true` if this id's hex form starts with `prefix` (case-insensitive).
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.to_string().starts_with(&prefix.to_ascii_lowercase())
    }
}

impl fmt::Display for GitOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for GitOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GitOid({self})")
    }
}

impl FromStr for GitOid {
    type Err = OidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::HEX_LEN {
            return Err(OidParseError {
                value: s.to_owned(),
                reason: format!("expected 40 hex characters, got {}", s.len()),
            });
        }
        let mut bytes = [0u8; 20];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let hi = hex_digit(chunk[0]).ok_or_else(|| OidParseError {
                value: s.to_owned(),
                reason: format!("invalid hex digit '{}'", chunk[0] as char),
            })?;
            let lo = hex_digit(chunk[1]).ok_or_else(|| OidParseError {
                value: s.to_owned(),
                reason: format!("invalid hex digit '{}'", chunk[1] as char),
            })?;
            bytes[i] = (hi << 4) | lo;
        }
        Ok(Self(bytes))
    }
}

/// Error from parsing a hex string into a [`GitOid`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OidParseError {
    /// The raw value that failed.
    pub value: String,
    /// Why it failed.
    pub reason: String,
}

impl fmt::Display for OidParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid OID {:?}: {}", self.value, self.reason)
    }
}

impl std::error::Error for OidParseError {}

const fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        // Accept uppercase for leniency during parsing
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tree types
// ---------------------------------------------------------------------------

/// The file mode of a tree entry (analogous to `git ls-tree` mode column).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryMode {
    /// Regular file (`100644`).
    Blob,
    /// Executable file (`100755`).
    BlobExecutable,
    /// Subdirectory (`040000`).
    Tree,
    /// Symbolic link (`120000`).
    Link,
    /// Gitlink / submodule (`160000`).
    Commit,
}

impl EntryMode {
    /// `true` if both modes describe the same kind of object.
    ///
    /// Regular and executable files are the same kind; a file turning into
    /// a symlink or submodule is not.
    #[must_use]
    pub const fn same_kind(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Blob | Self::BlobExecutable, Self::Blob | Self::BlobExecutable)
                | (Self::Tree, Self::Tree)
                | (Self::Link, Self::Link)
                | (Self::Commit, Self::Commit)
        )
    }
}

/// A single non-tree entry of a commit's tree, addressed by its full path.
///
/// Produced by [`GitRepo::list_tree`](crate::GitRepo::list_tree), which
/// flattens nested trees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    /// Slash-separated path relative to the tree root (e.g. `"a/src/Main.java"`).
    pub path: String,
    /// The entry mode.
    pub mode: EntryMode,
    /// The OID of the blob or commit this entry points to.
    pub oid: GitOid,
}

// ---------------------------------------------------------------------------
// Change types
// ---------------------------------------------------------------------------

/// The kind of change observed for a path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChangeType {
    /// File was added (or is untracked).
    Added,
    /// File content or mode was modified.
    Modified,
    /// File was deleted.
    Deleted,
    /// File was renamed (may also be modified).
    Renamed {
        /// The original path before the rename.
        from: String,
    },
    /// File changed kind (e.g. regular file to symlink).
    TypeChange,
}

impl ChangeType {
    /// Single-letter status code, as in `git status --short`.
    #[must_use]
    pub const fn code(&self) -> char {
        match self {
            Self::Added => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::Renamed { .. } => 'R',
            Self::TypeChange => 'T',
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => f.write_str("added"),
            Self::Modified => f.write_str("modified"),
            Self::Deleted => f.write_str("deleted"),
            Self::Renamed { from } => write!(f, "renamed from {from}"),
            Self::TypeChange => f.write_str("type changed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Status types
// ---------------------------------------------------------------------------

/// Which comparison a status entry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusSide {
    /// HEAD tree vs. index: staged, not yet committed.
    Index,
    /// Index vs. working tree: unstaged edits and untracked files.
    Worktree,
}

/// A single entry from `git status`, pairing a path with its change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusEntry {
    /// Path relative to the repository root (the new path for renames).
    pub path: String,
    /// What changed.
    pub change: ChangeType,
    /// Which axis reported it.
    pub side: StatusSide,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oid_roundtrip_hex() {
        let hex = "0123456789abcdef0123456789abcdef01234567";
        let oid: GitOid = hex.parse().unwrap();
        assert_eq!(oid.to_string(), hex);
    }

    #[test]
    fn oid_rejects_short() {
        assert!("abc".parse::<GitOid>().is_err());
    }

    #[test]
    fn oid_rejects_non_hex() {
        let bad = "g".repeat(40);
        assert!(bad.parse::<GitOid>().is_err());
    }

    #[test]
    fn oid_short_form() {
        let oid: GitOid = "0123456789abcdef0123456789abcdef01234567".parse().unwrap();
        assert_eq!(oid.short(7), "0123456");
        assert_eq!(oid.short(100).len(), 40);
    }

    #[test]
    fn oid_prefix_is_case_insensitive() {
        let oid: GitOid = "abcdef0123456789abcdef0123456789abcdef01".parse().unwrap();
        assert!(oid.has_prefix("ABCDEF0"));
        assert!(!oid.has_prefix("abcdef1"));
    }

    #[test]
    fn executable_bit_is_not_a_kind_change() {
        assert!(EntryMode::Blob.same_kind(EntryMode::BlobExecutable));
        assert!(!EntryMode::Blob.same_kind(EntryMode::Link));
        assert!(!EntryMode::Commit.same_kind(EntryMode::Blob));
    }

    #[test]
    fn change_codes() {
        assert_eq!(ChangeType::Added.code(), 'A');
        assert_eq!(ChangeType::Renamed { from: "x".into() }.code(), 'R');
        assert_eq!(ChangeType::TypeChange.code(), 'T');
    }
}
