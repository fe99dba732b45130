//! Maps changed paths to the module that owns them.
//!
//! Ownership follows a fixed layout: a module root directory holds the
//! descriptor (`pom.xml`) and the module's sources live below a marker
//! directory (`src`) directly inside it. So `billing/core/src/main/X.java`
//! belongs to whatever `billing/core/pom.xml` declares. Paths outside any
//! marker directory (docs, scripts, CI files) belong to no module.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::instrument;

use crate::config::ModuleLayout;
use crate::descriptor::{DescriptorReader, ModuleId};
use crate::error::ModscopeError;

/// Why a changed path belongs to no module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The path is not below a module's source directory (docs, CI files).
    OutsideModules,
    /// The path belonged to a module that no longer exists on disk.
    ModuleRemoved,
}

/// Outcome of resolving one path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Owner {
    Module(ModuleId),
    Ignored(IgnoreReason),
}

impl Owner {
    #[must_use]
    pub fn into_module(self) -> Option<ModuleId> {
        match self {
            Self::Module(id) => Some(id),
            Self::Ignored(_) => None,
        }
    }
}

/// Resolves path ownership against the files on disk under `root`.
///
/// Lookups are cached per module root for the lifetime of the resolver, so
/// each module directory is listed at most once per run.
pub struct OwnershipResolver<'a> {
    root: PathBuf,
    layout: &'a ModuleLayout,
    reader: &'a dyn DescriptorReader,
    /// module root (repo-relative, `""` for the repo root) → owner
    memo: HashMap<String, Owner>,
}

impl<'a> OwnershipResolver<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        layout: &'a ModuleLayout,
        reader: &'a dyn DescriptorReader,
    ) -> Self {
        Self {
            root: root.into(),
            layout,
            reader,
            memo: HashMap::new(),
        }
    }

    /// The module owning `path` (repo-relative, `/`-separated), or `None`
    /// if the path is outside the module layout or its module was removed.
    ///
    /// # Errors
    /// See [`Self::owner_of`].
    pub fn resolve_owner(&mut self, path: &str) -> Result<Option<ModuleId>, ModscopeError> {
        self.owner_of(path).map(Owner::into_module)
    }

    /// Like [`Self::resolve_owner`], but says why an ignored path has no
    /// module.
    ///
    /// A module root that still exists on disk counts as removed when both
    /// its descriptor and its source directory are gone; build output left
    /// behind in ignored directories (`target/`) does not keep it alive.
    ///
    /// # Errors
    /// - [`ModscopeError::FilesystemInconsistency`] if the module root has a
    ///   source directory but no descriptor.
    /// - [`ModscopeError::Descriptor`] if the descriptor cannot be read.
    /// - [`ModscopeError::Io`] if the module root cannot be listed.
    #[instrument(skip(self))]
    pub fn owner_of(&mut self, path: &str) -> Result<Owner, ModscopeError> {
        let path = path.trim_start_matches('/');
        let (dirs, file_name) = path.rsplit_once('/').unwrap_or(("", path));

        if file_name == self.layout.descriptor {
            if !self.root.join(path).is_file() {
                tracing::warn!(path, "ignoring descriptor of a removed module");
                return Ok(Owner::Ignored(IgnoreReason::ModuleRemoved));
            }
            return self.module_at(dirs, path);
        }

        let Some(module_root) = module_root_of(dirs, &self.layout.source_marker) else {
            tracing::warn!(
                path,
                marker = %self.layout.source_marker,
                "ignoring path outside any module source directory"
            );
            return Ok(Owner::Ignored(IgnoreReason::OutsideModules));
        };
        self.module_at(module_root, path)
    }

    fn module_at(&mut self, module_root: &str, path: &str) -> Result<Owner, ModscopeError> {
        if let Some(cached) = self.memo.get(module_root) {
            return Ok(cached.clone());
        }

        let dir = self.root.join(module_root);
        let descriptor = if dir.is_dir() {
            self.find_descriptor(&dir)?
        } else {
            None
        };
        let owner = match descriptor {
            Some(descriptor) => {
                let id = self.reader.module_id(&descriptor)?;
                tracing::debug!(module_root, module = %id, "resolved module");
                Owner::Module(id)
            }
            None if dir.join(&self.layout.source_marker).is_dir() => {
                return Err(ModscopeError::FilesystemInconsistency {
                    path: path.to_owned(),
                    module_root: dir,
                    descriptor: self.layout.descriptor.clone(),
                });
            }
            None => {
                tracing::warn!(path, module_root, "ignoring path of a removed module");
                Owner::Ignored(IgnoreReason::ModuleRemoved)
            }
        };

        self.memo.insert(module_root.to_owned(), owner.clone());
        Ok(owner)
    }

    /// Look for the descriptor among the immediate children of `dir`.
    fn find_descriptor(&self, dir: &Path) -> Result<Option<PathBuf>, ModscopeError> {
        let entries = std::fs::read_dir(dir).map_err(|e| ModscopeError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| ModscopeError::io(dir, e))?;
            if entry.file_name() == self.layout.descriptor.as_str() {
                return Ok(Some(entry.path()));
            }
        }
        Ok(None)
    }
}

/// The directory enclosing the first `marker` segment of `dirs`, or `None`
/// if no segment matches. A marker at the top level maps to the repo root.
fn module_root_of<'p>(dirs: &'p str, marker: &str) -> Option<&'p str> {
    if dirs.is_empty() {
        return None;
    }
    let mut offset = 0;
    for segment in dirs.split('/') {
        if segment == marker {
            return Some(dirs[..offset].trim_end_matches('/'));
        }
        offset += segment.len() + 1;
    }
    None
}
