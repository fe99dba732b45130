//! Git capability layer for modscope.
//!
//! This crate defines the [`GitRepo`] trait: the single interface through
//! which the change-resolution engine reads history and working-tree state.
//! No other modscope crate imports gix directly; they depend on
//! `modscope-git` and program against the trait.
//!
//! # Crate layout
//!
//! - [`repo`]: the [`GitRepo`] trait definition.
//! - [`types`]: value types used in trait signatures ([`GitOid`],
//!   [`TreeEntry`], [`StatusEntry`], etc.).
//! - [`error`]: the [`GitError`] enum returned by all trait methods.
//! - `mem_repo`: `MemRepo`, an in-memory implementation for tests, behind
//!   the `test-support` feature.

pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod mem_repo;
pub mod repo;
pub mod types;

// gix-backed implementation modules
mod gix_repo;
mod objects_impl;
mod refs_impl;
mod status_impl;

pub use gix_repo::GixRepo;

// Re-export the main trait and commonly used types at the crate root:
// `use modscope_git::{GitRepo, GitOid, GitError};`
pub use error::GitError;
#[cfg(any(test, feature = "test-support"))]
pub use mem_repo::MemRepo;
pub use repo::GitRepo;
pub use types::{
    ChangeType, EntryMode, GitOid, OidParseError, StatusEntry, StatusSide, TreeEntry,
};
