//! The whole run: last build commit in, modules to rebuild out.
//!
//! ```text
//! resolve last build ─┬─ same commit as HEAD ─────────┐
//!                     └─ diff last build vs HEAD ─────┤
//!                                                     ▼
//!                       scan working tree → resolve owners → merge
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use modscope_git::GitRepo;
use serde::Serialize;
use tracing::instrument;

use crate::change::ChangeRecord;
use crate::commit::{ABBREV_LEN, CommitRef, CommitResolver};
use crate::config::ModuleLayout;
use crate::descriptor::DescriptorReader;
use crate::diff;
use crate::error::ModscopeError;
use crate::modules::ModuleSet;
use crate::ownership::{IgnoreReason, Owner, OwnershipResolver};
use crate::worktree::WorkingTreeScanner;

/// Report of one run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// The last build commit as recorded.
    pub last_build: String,
    /// Full id of `HEAD`.
    pub head: String,
    /// `true` when the last build was made from `HEAD`, so only local edits
    /// were considered.
    pub history_skipped: bool,
    /// History changes first, then local ones.
    pub changes: Vec<ChangeRecord>,
    /// Changed paths that belong to no module, sorted by path.
    pub ignored: Vec<IgnoredPath>,
    /// Modules to rebuild.
    pub modules: ModuleSet,
}

/// A changed path left out of the module set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IgnoredPath {
    pub path: String,
    pub reason: IgnoreReason,
}

/// Ties the resolution stages together for one source tree.
pub struct Resolver<'a> {
    repo: &'a dyn GitRepo,
    repo_root: PathBuf,
    layout: &'a ModuleLayout,
    reader: &'a dyn DescriptorReader,
}

impl<'a> Resolver<'a> {
    pub fn new(
        repo: &'a dyn GitRepo,
        repo_root: impl Into<PathBuf>,
        layout: &'a ModuleLayout,
        reader: &'a dyn DescriptorReader,
    ) -> Self {
        Self {
            repo,
            repo_root: repo_root.into(),
            layout,
            reader,
        }
    }

    /// Resolve which modules changed since the build made from `last_build`.
    ///
    /// # Errors
    /// Any stage failure aborts the run; see [`ModscopeError`].
    #[instrument(skip(self))]
    pub fn run(&self, last_build: &str) -> Result<Resolution, ModscopeError> {
        let head = self.repo.head()?;
        let reference = CommitRef::parse(last_build)?;
        let commits = CommitResolver::new(self.repo);

        let history_skipped = reference.abbreviated() == head.short(ABBREV_LEN);
        let history = if history_skipped {
            tracing::info!(%reference, "last build is HEAD, only local changes count");
            Vec::new()
        } else {
            let old = commits.resolve(&reference)?;
            let new = commits.resolve(&CommitRef::Full(head))?;
            diff::diff(&old, &new)
        };

        let local = WorkingTreeScanner::new(self.repo).scan()?;

        let mut owners = OwnershipResolver::new(&self.repo_root, self.layout, self.reader);
        let mut ignored = BTreeMap::new();
        let from_history = owning_modules(&mut owners, &history, &mut ignored)?;
        let from_local = owning_modules(&mut owners, &local, &mut ignored)?;
        let modules = ModuleSet::merge(from_history, from_local);

        tracing::info!(
            changes = history.len() + local.len(),
            ignored = ignored.len(),
            modules = modules.len(),
            "resolution complete"
        );

        let mut changes = history;
        changes.extend(local);
        Ok(Resolution {
            last_build: reference.to_string(),
            head: head.to_string(),
            history_skipped,
            changes,
            ignored: ignored
                .into_iter()
                .map(|(path, reason)| IgnoredPath { path, reason })
                .collect(),
            modules,
        })
    }
}

fn owning_modules(
    owners: &mut OwnershipResolver<'_>,
    records: &[ChangeRecord],
    ignored: &mut BTreeMap<String, IgnoreReason>,
) -> Result<ModuleSet, ModscopeError> {
    let mut modules = ModuleSet::new();
    for path in records.iter().flat_map(ChangeRecord::affected_paths) {
        match owners.owner_of(path)? {
            Owner::Module(id) => {
                modules.insert(id);
            }
            Owner::Ignored(reason) => {
                ignored.insert(path.to_owned(), reason);
            }
        }
    }
    Ok(modules)
}
