//! Git integration for bitgugs.
//!
//! This crate provides the [`Vcs`] abstraction over the version-control
//! operations the issue tracker needs, its implementation on top of the
//! `git` binary, blame-based field history, and the working-tree guard used
//! by `--commit`.

pub mod blame;
pub mod commands;
pub mod gitdir;
pub mod guard;
pub mod vcs;

pub use commands::GitError;
pub use guard::{Restore, WorkingTreeGuard};
pub use vcs::{GitCli, LineAttribution, SnapshotId, Vcs};
