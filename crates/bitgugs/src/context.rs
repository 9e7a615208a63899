//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds all the state a command handler needs:
//! repository root, loaded configuration, the git binding, the issue store
//! and the global flags.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use bitgugs_config::{BitgugsConfig, load_config};
use bitgugs_core::IssueStore;
use bitgugs_git::{GitCli, Vcs};

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Top level of the git repository.
    pub root: PathBuf,

    /// Effective configuration.
    pub config: BitgugsConfig,

    /// Git binding, running from the repository root.
    pub vcs: GitCli,

    /// Issue files under `<root>/<issue-dir>`.
    pub store: IssueStore,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Whether mutating commands commit their changes.
    pub commit: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` for the repository containing the current
    /// directory.
    ///
    /// # Errors
    ///
    /// Fails when not inside a git repository or when the configuration
    /// cannot be loaded.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let cwd = env::current_dir().context("cannot determine current directory")?;
        let root = GitCli::new(&cwd).root()?;
        Self::for_root(root, global)
    }

    fn for_root(root: PathBuf, global: &GlobalArgs) -> Result<Self> {
        let config = load_config(&root)
            .with_context(|| format!("invalid configuration in {}", root.display()))?;
        let store = IssueStore::new(&root, config.issue_dir.as_str(), config.first_id);
        tracing::debug!(root = %root.display(), issue_dir = %config.issue_dir, "resolved repository");

        Ok(Self {
            vcs: GitCli::new(&root),
            root,
            config,
            store,
            json: global.json,
            commit: global.commit,
        })
    }

    /// `path` relative to the repository root, for display.
    pub fn display_path<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(&self.root).unwrap_or(path).display()
    }
}
