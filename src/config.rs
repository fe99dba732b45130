//! Repository configuration (`modscope.toml` at the source root).
//!
//! Everything has a default matching a standard Maven checkout, so the file
//! is optional. A file that exists must parse cleanly: unknown keys are
//! rejected so typos do not silently fall back to defaults.

use std::path::Path;

use serde::Deserialize;

use crate::error::ModscopeError;

/// Name of the config file, looked up in the source root.
pub const CONFIG_FILE: &str = "modscope.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModscopeConfig {
    /// Where the last build recorded its commit.
    #[serde(default)]
    pub build_info: BuildInfoConfig,

    /// Module directory convention.
    #[serde(default)]
    pub modules: ModuleLayout,

    /// How to invoke the build tool.
    #[serde(default)]
    pub build: BuildConfig,
}

// ---------------------------------------------------------------------------
// BuildInfoConfig
// ---------------------------------------------------------------------------

/// Location and key of the build-info properties file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildInfoConfig {
    /// Path of the properties file, relative to the source root.
    #[serde(default = "default_build_info_path")]
    pub path: String,

    /// Key holding the abbreviated commit of the last build.
    #[serde(default = "default_build_info_key")]
    pub key: String,
}

impl Default for BuildInfoConfig {
    fn default() -> Self {
        Self {
            path: default_build_info_path(),
            key: default_build_info_key(),
        }
    }
}

fn default_build_info_path() -> String {
    "target/classes/build-info.properties".to_owned()
}

fn default_build_info_key() -> String {
    "build.number".to_owned()
}

// ---------------------------------------------------------------------------
// ModuleLayout
// ---------------------------------------------------------------------------

/// The directory convention that ties a source file to its module.
///
/// A module root holds `descriptor`; its sources live below a
/// `source_marker` directory directly inside that root.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleLayout {
    /// Descriptor file name (default: `"pom.xml"`).
    #[serde(default = "default_descriptor")]
    pub descriptor: String,

    /// Source-boundary directory name (default: `"src"`).
    #[serde(default = "default_source_marker")]
    pub source_marker: String,
}

impl Default for ModuleLayout {
    fn default() -> Self {
        Self {
            descriptor: default_descriptor(),
            source_marker: default_source_marker(),
        }
    }
}

fn default_descriptor() -> String {
    "pom.xml".to_owned()
}

fn default_source_marker() -> String {
    "src".to_owned()
}

// ---------------------------------------------------------------------------
// BuildConfig
// ---------------------------------------------------------------------------

/// Build tool invocation.
///
/// ```toml
/// [build]
/// program = "mvn"
/// projects_flag = "--projects"
/// scoped_args = ["--also-make-dependents", "clean", "install", "-DskipTests"]
/// full_args = ["clean", "install", "-DskipTests=true", "-P", "full"]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Build tool executable.
    #[serde(default = "default_program")]
    pub program: String,

    /// Flag that takes the comma-separated module list.
    #[serde(default = "default_projects_flag")]
    pub projects_flag: String,

    /// Arguments after the module list for a scoped build.
    #[serde(default = "default_scoped_args")]
    pub scoped_args: Vec<String>,

    /// Arguments for a full build (suggested when no build record exists).
    #[serde(default = "default_full_args")]
    pub full_args: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            projects_flag: default_projects_flag(),
            scoped_args: default_scoped_args(),
            full_args: default_full_args(),
        }
    }
}

fn default_program() -> String {
    "mvn".to_owned()
}

fn default_projects_flag() -> String {
    "--projects".to_owned()
}

fn default_scoped_args() -> Vec<String> {
    ["--also-make-dependents", "clean", "install", "-DskipTests"]
        .map(str::to_owned)
        .to_vec()
}

fn default_full_args() -> Vec<String> {
    ["clean", "install", "-DskipTests=true", "-P", "full"]
        .map(str::to_owned)
        .to_vec()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl ModscopeConfig {
    /// Load `modscope.toml` from `source_root`.
    ///
    /// A missing file yields all defaults.
    ///
    /// # Errors
    /// Returns [`ModscopeError::Configuration`] on I/O errors other than
    /// not-found, invalid TOML, or unknown keys.
    pub fn load(source_root: &Path) -> Result<Self, ModscopeError> {
        let path = source_root.join(CONFIG_FILE);
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ModscopeError::configuration(format!(
                    "could not read {}: {e}",
                    path.display()
                )));
            }
        };
        Self::parse(&contents).map_err(|message| {
            ModscopeError::configuration(format!("{}: {message}", path.display()))
        })
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns the parse message, prefixed with the line number when known.
    pub fn parse(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| {
            let message = e.message().to_owned();
            e.span().map_or_else(
                || message.clone(),
                |span| {
                    let line = toml_str[..span.start]
                        .chars()
                        .filter(|&c| c == '\n')
                        .count()
                        + 1;
                    format!("line {line}: {message}")
                },
            )
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
