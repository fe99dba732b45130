//! The gix-backed implementation of [`GitRepo`].

use std::path::{Path, PathBuf};

use crate::error::GitError;
use crate::repo::GitRepo;
use crate::types::{GitOid, StatusEntry, TreeEntry};

/// A [`GitRepo`] implementation backed by [gix](https://github.com/GitoxideLabs/gitoxide).
///
/// Construct via [`GixRepo::open`] or [`GixRepo::open_at`].
pub struct GixRepo {
    pub(crate) repo: gix::Repository,
    pub(crate) workdir: Option<PathBuf>,
}

impl GixRepo {
    /// Open the git repository at or above `path`.
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = gix::discover(path).map_err(|e| GitError::BackendError {
            message: format!("cannot open repository at {}: {e}", path.display()),
        })?;
        let workdir = repo.workdir().map(Path::to_path_buf);
        Ok(Self { repo, workdir })
    }

    /// Open a git repository at exactly `path` (no parent discovery).
    pub fn open_at(path: &Path) -> Result<Self, GitError> {
        let repo = gix::open_opts(path, gix::open::Options::isolated()).map_err(|e| {
            GitError::BackendError {
                message: format!("cannot open repository at {}: {e}", path.display()),
            }
        })?;
        let workdir = repo.workdir().map(Path::to_path_buf);
        Ok(Self { repo, workdir })
    }
}

impl GitRepo for GixRepo {
    fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    // === Rev-parse ===
    fn head(&self) -> Result<GitOid, GitError> {
        crate::refs_impl::head(self)
    }

    fn rev_parse(&self, spec: &str) -> Result<GitOid, GitError> {
        crate::refs_impl::rev_parse(self, spec)
    }

    // === Objects ===
    fn commit_tree(&self, commit: GitOid) -> Result<GitOid, GitError> {
        crate::objects_impl::commit_tree(self, commit)
    }

    fn list_tree(&self, tree: GitOid) -> Result<Vec<TreeEntry>, GitError> {
        crate::objects_impl::list_tree(self, tree)
    }

    // === Status ===
    fn status(&self) -> Result<Vec<StatusEntry>, GitError> {
        crate::status_impl::status(self)
    }
}
