//! In-memory [`GitRepo`] for tests.
//!
//! [`MemRepo`] models just enough of a repository for change resolution:
//! commits with flat file trees, a `HEAD`, and a canned status list. Object
//! ids are content-derived, so identical file contents share a blob id the
//! same way they do in git.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::GitError;
use crate::repo::GitRepo;
use crate::types::{ChangeType, EntryMode, GitOid, StatusEntry, StatusSide, TreeEntry};

/// An in-memory repository. Build it with [`MemRepo::commit`] and
/// [`MemRepo::stage`] / [`MemRepo::touch`].
#[derive(Debug, Default)]
pub struct MemRepo {
    /// commit id → tree id
    commits: BTreeMap<GitOid, GitOid>,
    /// tree id → entries (already sorted by path)
    trees: BTreeMap<GitOid, Vec<TreeEntry>>,
    head: Option<GitOid>,
    status: Vec<StatusEntry>,
    workdir: Option<PathBuf>,
}

impl MemRepo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a working directory, so [`GitRepo::workdir`] reports it.
    #[must_use]
    pub fn with_workdir(mut self, path: impl Into<PathBuf>) -> Self {
        self.workdir = Some(path.into());
        self
    }

    /// Record a commit whose tree holds exactly `files` (`(path, content)`)
    /// and move `HEAD` to it.
    pub fn commit(&mut self, files: &[(&str, &str)]) -> GitOid {
        let seed = format!("commit {} {:?}", self.commits.len(), self.head);
        let id = oid_of(seed.as_bytes());
        self.commit_with_id(id, files)
    }

    /// Like [`commit`](Self::commit) but with a caller-chosen commit id, for
    /// exercising prefix collisions.
    pub fn commit_with_id(&mut self, id: GitOid, files: &[(&str, &str)]) -> GitOid {
        let mut entries: Vec<TreeEntry> = files
            .iter()
            .map(|(path, content)| TreeEntry {
                path: (*path).to_owned(),
                mode: EntryMode::Blob,
                oid: blob_oid(content),
            })
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        let mut listing = String::new();
        for entry in &entries {
            let _ = writeln!(listing, "{} {}", entry.oid, entry.path);
        }
        let tree = oid_of(format!("tree\n{listing}").as_bytes());

        self.trees.insert(tree, entries);
        self.commits.insert(id, tree);
        self.head = Some(id);
        id
    }

    /// Point `HEAD` at an existing commit.
    pub fn set_head(&mut self, id: GitOid) {
        self.head = Some(id);
    }

    /// Record a staged (HEAD vs index) change.
    pub fn stage(&mut self, path: &str, change: ChangeType) {
        self.push_status(path, change, StatusSide::Index);
    }

    /// Record an unstaged (index vs worktree) change or untracked file.
    pub fn touch(&mut self, path: &str, change: ChangeType) {
        self.push_status(path, change, StatusSide::Worktree);
    }

    fn push_status(&mut self, path: &str, change: ChangeType, side: StatusSide) {
        self.status.push(StatusEntry {
            path: path.to_owned(),
            change,
            side,
        });
    }
}

/// The id a blob with `content` gets in a [`MemRepo`].
#[must_use]
pub fn blob_oid(content: &str) -> GitOid {
    oid_of(format!("blob {}\0{content}", content.len()).as_bytes())
}

fn oid_of(data: &[u8]) -> GitOid {
    let digest = Sha256::digest(data);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest[..20]);
    GitOid::from_bytes(bytes)
}

impl GitRepo for MemRepo {
    fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    fn head(&self) -> Result<GitOid, GitError> {
        self.head.ok_or_else(|| GitError::NotFound {
            message: "HEAD is unborn".to_owned(),
        })
    }

    fn rev_parse(&self, spec: &str) -> Result<GitOid, GitError> {
        if spec == "HEAD" {
            return self.head();
        }
        let matches: Vec<GitOid> = self
            .commits
            .keys()
            .chain(self.trees.keys())
            .filter(|oid| oid.has_prefix(spec))
            .copied()
            .collect();
        match matches.as_slice() {
            [] => Err(GitError::NotFound {
                message: format!("rev-parse '{spec}': no object with that prefix"),
            }),
            [only] => Ok(*only),
            many => Err(GitError::AmbiguousRef {
                spec: spec.to_owned(),
                message: format!("{} candidates", many.len()),
            }),
        }
    }

    fn commit_tree(&self, commit: GitOid) -> Result<GitOid, GitError> {
        self.commits
            .get(&commit)
            .copied()
            .ok_or_else(|| GitError::NotFound {
                message: format!("commit {commit}"),
            })
    }

    fn list_tree(&self, tree: GitOid) -> Result<Vec<TreeEntry>, GitError> {
        self.trees.get(&tree).cloned().ok_or_else(|| GitError::NotFound {
            message: format!("tree {tree}"),
        })
    }

    fn status(&self) -> Result<Vec<StatusEntry>, GitError> {
        Ok(self.status.clone())
    }
}
