//! Git command execution wrappers.
//!
//! Provides a thin wrapper around `git` subprocess invocation so that the
//! rest of the codebase does not need to deal with `std::process::Command`
//! directly. Every invocation is checked: a non-zero exit becomes a
//! [`GitError::CommandFailed`] carrying git's diagnostics.

use std::path::Path;
use std::process::Command;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when running git commands.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be found or spawned.
    #[error("failed to execute git: {0}")]
    SpawnError(#[from] std::io::Error),

    /// The git command exited with a non-zero status.
    #[error("git {command} failed (exit code {code:?}): {output}")]
    CommandFailed {
        /// The git subcommand that failed.
        command: String,
        /// The exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        /// The content of stderr, or of stdout when stderr was empty.
        output: String,
    },

    /// Not inside a git repository.
    #[error("Could not find issues, not in Git repository?")]
    NotARepo,

    /// Neither `user.name` nor `user.email` is configured.
    #[error("no git identity configured (set user.name or user.email)")]
    NoIdentity,

    /// `git blame` produced output that could not be understood.
    #[error("unexpected git blame output: {0}")]
    BlameOutput(String),
}

/// A specialized `Result` type for git operations.
pub type Result<T> = std::result::Result<T, GitError>;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Execute a `git` command with the given arguments and working directory.
///
/// Returns the trimmed contents of stdout on success.
///
/// # Errors
///
/// Returns [`GitError::SpawnError`] if `git` cannot be found, or
/// [`GitError::CommandFailed`] if the command exits with a non-zero status.
///
/// # Examples
///
/// ```no_run
/// use bitgugs_git::commands::git_command;
/// use std::path::Path;
///
/// let root = git_command(&["rev-parse", "--show-toplevel"], Path::new(".")).unwrap();
/// println!("Repository root: {root}");
/// ```
pub fn git_command(args: &[&str], cwd: &Path) -> Result<String> {
    git_command_raw(args, cwd).map(|out| out.trim().to_string())
}

/// Like [`git_command`], but returns stdout untouched.
///
/// Needed where trailing whitespace is significant, e.g. blame content.
pub fn git_command_raw(args: &[&str], cwd: &Path) -> Result<String> {
    tracing::debug!(?args, cwd = %cwd.display(), "running git");
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()?;

    if !output.status.success() {
        // Some commands, `stash apply` among them, report conflicts on stdout.
        let mut diagnostics = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if diagnostics.is_empty() {
            diagnostics = String::from_utf8_lossy(&output.stdout).trim().to_string();
        }
        return Err(GitError::CommandFailed {
            command: args.first().copied().unwrap_or_default().to_string(),
            code: output.status.code(),
            output: diagnostics,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_command_version() {
        // `git --version` should succeed on any system with git installed.
        let result = git_command(&["--version"], Path::new("."));
        assert!(result.is_ok(), "git --version failed: {result:?}");
        let output = result.unwrap();
        assert!(
            output.starts_with("git version"),
            "unexpected output: {output}"
        );
    }

    #[test]
    fn test_git_command_failure() {
        // An invalid git subcommand should fail.
        let result = git_command(&["not-a-real-subcommand"], Path::new("."));
        match result.unwrap_err() {
            GitError::CommandFailed {
                command,
                code,
                output,
            } => {
                assert_eq!(command, "not-a-real-subcommand");
                assert!(code.is_some());
                assert!(!output.is_empty());
            }
            other => panic!("expected CommandFailed, got: {other:?}"),
        }
    }

    #[test]
    fn test_git_command_bad_cwd() {
        // Running git in a nonexistent directory should fail to spawn.
        let result = git_command(&["status"], Path::new("/nonexistent/directory/xyz"));
        assert!(matches!(result, Err(GitError::SpawnError(_))));
    }

    #[test]
    fn test_git_command_raw_keeps_whitespace() {
        let out = git_command_raw(&["--version"], Path::new(".")).unwrap();
        assert!(out.ends_with('\n'));
    }
}
