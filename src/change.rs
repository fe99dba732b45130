//! Change records shared by the history diff and the working-tree scan.

use std::fmt;

use modscope_git::ChangeType;
use serde::Serialize;

/// Where a change was observed. Used for reporting only; resolution treats
/// all origins alike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOrigin {
    /// Between the last build commit and HEAD.
    History,
    /// Staged in the index, not committed.
    Staged,
    /// Unstaged edit or untracked file in the working tree.
    Unstaged,
}

impl fmt::Display for ChangeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::History => "history",
            Self::Staged => "staged",
            Self::Unstaged => "unstaged",
        })
    }
}

/// One changed path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChangeRecord {
    /// Path relative to the repository root (new path for renames).
    pub path: String,
    /// What changed.
    pub kind: ChangeType,
    /// Which comparison reported it.
    pub origin: ChangeOrigin,
}

impl ChangeRecord {
    /// Every path whose owning module is affected by this change: the path
    /// itself and, for renames, the path it was renamed from.
    pub fn affected_paths(&self) -> impl Iterator<Item = &str> {
        let from = match &self.kind {
            ChangeType::Renamed { from } => Some(from.as_str()),
            _ => None,
        };
        std::iter::once(self.path.as_str()).chain(from)
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ChangeType::Renamed { from } => {
                write!(f, "[{}] {} -> {}", self.kind.code(), from, self.path)
            }
            kind => write!(f, "[{}] {}", kind.code(), self.path),
        }
    }
}

impl Serialize for ChangeRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct as _;

        let from = match &self.kind {
            ChangeType::Renamed { from } => Some(from.as_str()),
            _ => None,
        };
        let mut s = serializer.serialize_struct("ChangeRecord", 4)?;
        s.serialize_field("path", &self.path)?;
        s.serialize_field("status", &self.kind.code().to_string())?;
        s.serialize_field("from", &from)?;
        s.serialize_field("origin", &self.origin)?;
        s.end()
    }
}
