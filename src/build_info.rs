//! Reader for the build-info record left behind by the last build.
//!
//! The record is a Java `.properties` file written by the build itself. Only
//! one key matters here: the abbreviated commit the build was made from.

use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::{BuildInfoConfig, BuildConfig};
use crate::error::ModscopeError;
use crate::invoke::BuildPlan;

/// The parsed build-info record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildInfo {
    /// Where the record was read from.
    pub path: PathBuf,
    /// All properties, sorted by key for stable display.
    pub properties: BTreeMap<String, String>,
    key: String,
}

impl BuildInfo {
    /// Read the record configured by `config` under `source_root`.
    ///
    /// # Errors
    /// - [`ModscopeError::BuildInfoMissing`] if the file does not exist; the
    ///   error carries the full-build command from `build`.
    /// - [`ModscopeError::Configuration`] if the file cannot be parsed.
    pub fn load(
        source_root: &Path,
        config: &BuildInfoConfig,
        build: &BuildConfig,
    ) -> Result<Self, ModscopeError> {
        let path = source_root.join(&config.path);
        let file = match std::fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ModscopeError::BuildInfoMissing {
                    path,
                    full_build: BuildPlan::full(build).to_string(),
                });
            }
            Err(e) => return Err(ModscopeError::io(path, e)),
        };
        let properties = java_properties::read(BufReader::new(file)).map_err(|e| {
            ModscopeError::configuration(format!("cannot parse {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), keys = properties.len(), "read build info");
        Ok(Self {
            path,
            properties: properties.into_iter().collect(),
            key: config.key.clone(),
        })
    }

    /// The commit recorded by the last build.
    ///
    /// # Errors
    /// Returns [`ModscopeError::Configuration`] if the key is absent or blank,
    /// which means no valid prior build exists.
    pub fn last_build_commit(&self) -> Result<&str, ModscopeError> {
        match self.properties.get(&self.key).map(|v| v.trim()) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ModscopeError::configuration(format!(
                "cannot find {} in {}",
                self.key,
                self.path.display()
            ))),
        }
    }
}
