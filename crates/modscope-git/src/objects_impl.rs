//! gix-backed commit and tree reads.

use gix::bstr::ByteSlice;

use crate::error::GitError;
use crate::gix_repo::GixRepo;
use crate::types::{EntryMode, GitOid, TreeEntry};

/// Convert our `GitOid` to a `gix::ObjectId`.
pub(crate) fn to_gix_oid(oid: GitOid) -> gix::ObjectId {
    gix::ObjectId::from_bytes_or_panic(oid.as_bytes())
}

/// Convert a `gix::ObjectId` (or `&gix::oid`) to a `GitOid`.
pub(crate) fn from_gix_oid(oid: &gix::oid) -> GitOid {
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(oid.as_bytes());
    GitOid::from_bytes(bytes)
}

/// Convert a gix `EntryMode` to our `EntryMode`.
fn from_gix_entry_mode(mode: gix::objs::tree::EntryMode) -> EntryMode {
    match mode.kind() {
        gix::objs::tree::EntryKind::Tree => EntryMode::Tree,
        gix::objs::tree::EntryKind::Blob => EntryMode::Blob,
        gix::objs::tree::EntryKind::BlobExecutable => EntryMode::BlobExecutable,
        gix::objs::tree::EntryKind::Link => EntryMode::Link,
        gix::objs::tree::EntryKind::Commit => EntryMode::Commit,
    }
}

pub fn commit_tree(repo: &GixRepo, commit: GitOid) -> Result<GitOid, GitError> {
    let found = repo
        .repo
        .find_commit(to_gix_oid(commit))
        .map_err(|e| GitError::NotFound {
            message: format!("commit {commit}: {e}"),
        })?;
    let tree_id = found.tree_id().map_err(|e| GitError::BackendError {
        message: format!("failed to decode commit {commit}: {e}"),
    })?;
    Ok(from_gix_oid(tree_id.as_ref()))
}

pub fn list_tree(repo: &GixRepo, tree: GitOid) -> Result<Vec<TreeEntry>, GitError> {
    let found = repo
        .repo
        .find_tree(to_gix_oid(tree))
        .map_err(|e| GitError::NotFound {
            message: format!("tree {tree}: {e}"),
        })?;

    let mut recorder = gix::traverse::tree::Recorder::default();
    found
        .traverse()
        .breadthfirst(&mut recorder)
        .map_err(|e| GitError::BackendError {
            message: format!("failed to walk tree {tree}: {e}"),
        })?;

    let mut entries: Vec<TreeEntry> = recorder
        .records
        .into_iter()
        .filter(|record| !record.mode.is_tree())
        .map(|record| TreeEntry {
            path: record.filepath.to_str_lossy().into_owned(),
            mode: from_gix_entry_mode(record.mode),
            oid: from_gix_oid(&record.oid),
        })
        .collect();
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(%tree, entries = entries.len(), "listed tree");
    Ok(entries)
}
