//! Uncommitted changes: HEAD vs index and index vs working tree.

use modscope_git::{GitRepo, StatusSide};
use tracing::instrument;

use crate::change::{ChangeOrigin, ChangeRecord};
use crate::error::ModscopeError;

/// Lists local edits that have not been committed yet.
pub struct WorkingTreeScanner<'r> {
    repo: &'r dyn GitRepo,
}

impl<'r> WorkingTreeScanner<'r> {
    pub fn new(repo: &'r dyn GitRepo) -> Self {
        Self { repo }
    }

    /// Every staged, unstaged and untracked change, ordered by origin
    /// (staged first) and then path.
    ///
    /// # Errors
    /// Propagates backend failures as [`ModscopeError::Git`].
    #[instrument(skip(self))]
    pub fn scan(&self) -> Result<Vec<ChangeRecord>, ModscopeError> {
        let mut records: Vec<ChangeRecord> = self
            .repo
            .status()?
            .into_iter()
            .map(|entry| ChangeRecord {
                path: entry.path,
                kind: entry.change,
                origin: match entry.side {
                    StatusSide::Index => ChangeOrigin::Staged,
                    StatusSide::Worktree => ChangeOrigin::Unstaged,
                },
            })
            .collect();
        records.sort_by(|a, b| (a.origin, &a.path).cmp(&(b.origin, &b.path)));
        records.dedup();

        for rec in &records {
            tracing::debug!(origin = %rec.origin, change = %rec, "local change");
        }
        tracing::info!(files = records.len(), "working tree scanned");
        Ok(records)
    }
}
