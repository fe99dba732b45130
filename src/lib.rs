//! modscope library crate.
//!
//! Works out which modules of a multi-module git checkout changed since the
//! last recorded build, so only those (and their dependents) get rebuilt.
//! The `modscope` binary is a thin CLI over [`resolve::Resolver`]; the
//! modules are public so integration tests can drive each stage directly.

pub mod build_info;
pub mod change;
pub mod commit;
pub mod config;
pub mod descriptor;
pub mod diff;
pub mod error;
pub mod format;
pub mod invoke;
pub mod modules;
pub mod ownership;
pub mod report;
pub mod resolve;
pub mod telemetry;
pub mod worktree;

pub use error::ModscopeError;
pub use resolve::{Resolution, Resolver};
