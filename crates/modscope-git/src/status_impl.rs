//! gix-backed status over both axes (HEAD vs index, index vs worktree).

use gix::bstr::{BString, ByteSlice};

use crate::error::GitError;
use crate::gix_repo::GixRepo;
use crate::types::{ChangeType, StatusEntry, StatusSide};

pub fn status(repo: &GixRepo) -> Result<Vec<StatusEntry>, GitError> {
    let platform = repo
        .repo
        .status(gix::progress::Discard)
        .map_err(|e| GitError::BackendError {
            message: e.to_string(),
        })?
        .untracked_files(gix::status::UntrackedFiles::Files);

    let iter = platform
        .into_iter(Vec::<BString>::new())
        .map_err(|e| GitError::BackendError {
            message: e.to_string(),
        })?;

    let mut entries = Vec::new();
    for item in iter {
        let item = item.map_err(|e| GitError::BackendError {
            message: e.to_string(),
        })?;
        let entry = match &item {
            gix::status::Item::IndexWorktree(item) => convert_index_worktree(item),
            gix::status::Item::TreeIndex(change) => Some(convert_tree_index(change)),
        };
        if let Some(entry) = entry {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Index vs. worktree. `summary()` is `None` for entries that carry no
/// semantic change (e.g. stat-only updates), which drops them here.
fn convert_index_worktree(item: &gix::status::index_worktree::Item) -> Option<StatusEntry> {
    use gix::status::index_worktree::iter::Summary;

    let summary = item.summary()?;
    let path = item.rela_path().to_str_lossy().into_owned();

    let change = match summary {
        Summary::Added | Summary::IntentToAdd | Summary::Copied => ChangeType::Added,
        Summary::Modified | Summary::Conflict => ChangeType::Modified,
        Summary::TypeChange => ChangeType::TypeChange,
        Summary::Removed => ChangeType::Deleted,
        Summary::Renamed => match item {
            gix::status::index_worktree::Item::Rewrite { source, .. } => ChangeType::Renamed {
                from: source.rela_path().to_str_lossy().into_owned(),
            },
            _ => ChangeType::Added,
        },
    };

    Some(StatusEntry {
        path,
        change,
        side: StatusSide::Worktree,
    })
}

/// HEAD tree vs. index (staged changes).
fn convert_tree_index(change: &gix::diff::index::Change) -> StatusEntry {
    use gix::diff::index::ChangeRef;

    let (path, change) = match change {
        ChangeRef::Addition { location, .. } => (location, ChangeType::Added),
        ChangeRef::Deletion { location, .. } => (location, ChangeType::Deleted),
        ChangeRef::Modification { location, .. } => (location, ChangeType::Modified),
        ChangeRef::Rewrite {
            source_location,
            location,
            copy,
            ..
        } => {
            let change = if *copy {
                ChangeType::Added
            } else {
                ChangeType::Renamed {
                    from: source_location.to_str_lossy().into_owned(),
                }
            };
            (location, change)
        }
    };

    StatusEntry {
        path: path.to_str_lossy().into_owned(),
        change,
        side: StatusSide::Index,
    }
}
