//! The [`GitRepo`] trait: the abstraction boundary between modscope and git.
//!
//! The trait is deliberately narrow: change resolution only needs to find
//! commits, read their trees, and enumerate working-tree status. It is
//! object-safe so callers can hold `&dyn GitRepo`.
//!
//! | Group     | Methods                       | Replaces                          |
//! |-----------|-------------------------------|-----------------------------------|
//! | Rev-parse | `head`, `rev_parse`           | `git rev-parse HEAD`, `<prefix>`  |
//! | Objects   | `commit_tree`, `list_tree`    | `git cat-file`, `git ls-tree -r`  |
//! | Status    | `status`                      | `git status --porcelain -uall`    |

use std::path::Path;

use crate::error::GitError;
use crate::types::{GitOid, StatusEntry, TreeEntry};

/// Read-only git access used by the resolution engine.
///
/// Implementations: [`GixRepo`](crate::GixRepo) for real repositories and
/// `MemRepo` (feature `test-support`) for tests. Nothing here mutates
/// repository state.
pub trait GitRepo {
    /// Root of the working tree, if the repository has one.
    fn workdir(&self) -> Option<&Path>;

    /// Resolve `HEAD` to the commit it points at.
    ///
    /// Returns [`GitError::NotFound`] for an unborn `HEAD`.
    fn head(&self) -> Result<GitOid, GitError>;

    /// Resolve a revision specification (typically an abbreviated object id)
    /// to a single object.
    ///
    /// Returns [`GitError::AmbiguousRef`] if an abbreviated id matches more
    /// than one object and [`GitError::NotFound`] if nothing matches.
    fn rev_parse(&self, spec: &str) -> Result<GitOid, GitError>;

    /// Look up a commit by exact id and return its root tree id.
    ///
    /// Returns [`GitError::NotFound`] if `commit` does not name a commit.
    fn commit_tree(&self, commit: GitOid) -> Result<GitOid, GitError>;

    /// Recursively list every non-tree entry of `tree`, sorted by path.
    fn list_tree(&self, tree: GitOid) -> Result<Vec<TreeEntry>, GitError>;

    /// Enumerate staged (HEAD vs index) and unstaged (index vs worktree)
    /// changes, including untracked files expanded to individual paths.
    ///
    /// Entries with no semantic change are omitted.
    fn status(&self) -> Result<Vec<StatusEntry>, GitError>;
}
