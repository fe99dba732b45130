//! Module descriptor reading.
//!
//! The ownership resolver finds *which* descriptor governs a path; turning
//! that descriptor into a module name is delegated to a [`DescriptorReader`].
//! [`PomReader`] handles Maven `pom.xml` files.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModscopeError;

/// A module name, the unit of build granularity (Maven `artifactId`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    /// Create a module id. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    /// Returns the trimmed input back if it is empty.
    pub fn new(name: &str) -> Result<Self, String> {
        let name = name.trim();
        if name.is_empty() {
            Err(name.to_owned())
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// The module name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads the module identifier out of a descriptor file.
pub trait DescriptorReader {
    /// Return the identifier declared by the descriptor at `path`.
    ///
    /// # Errors
    /// Returns [`ModscopeError::Descriptor`] for unreadable or malformed
    /// content.
    fn module_id(&self, path: &Path) -> Result<ModuleId, ModscopeError>;
}

/// Reads `<project><artifactId>` from a Maven POM.
#[derive(Clone, Copy, Debug, Default)]
pub struct PomReader;

#[derive(Deserialize)]
struct PomProject {
    #[serde(rename = "artifactId")]
    artifact_id: Option<String>,
}

impl PomReader {
    /// Parse POM content. Only the project's own `artifactId` counts; the one
    /// nested in `<parent>` is ignored.
    ///
    /// # Errors
    /// Returns a description of the problem.
    pub fn parse(xml: &str) -> Result<ModuleId, String> {
        let project: PomProject = quick_xml::de::from_str(xml).map_err(|e| e.to_string())?;
        let artifact_id = project
            .artifact_id
            .ok_or_else(|| "no <artifactId> element".to_owned())?;
        ModuleId::new(&artifact_id).map_err(|_| "empty <artifactId> element".to_owned())
    }
}

impl DescriptorReader for PomReader {
    fn module_id(&self, path: &Path) -> Result<ModuleId, ModscopeError> {
        let xml = std::fs::read_to_string(path).map_err(|e| ModscopeError::Descriptor {
            path: path.to_owned(),
            detail: e.to_string(),
        })?;
        Self::parse(&xml).map_err(|detail| ModscopeError::Descriptor {
            path: path.to_owned(),
            detail,
        })
    }
}
