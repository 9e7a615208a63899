//! Repository discovery and git identity lookup.

use crate::commands::{GitError, Result, git_command};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Get the repository root using `git rev-parse --show-toplevel`.
///
/// Respects worktrees and submodules.
///
/// # Errors
///
/// Returns [`GitError::NotARepo`] if `cwd` is not inside a repository (or
/// git reports no top level, e.g. inside a bare repository).
pub fn git_root(cwd: &Path) -> Result<PathBuf> {
    match git_command(&["rev-parse", "--show-toplevel"], cwd) {
        Ok(output) if !output.is_empty() => Ok(PathBuf::from(normalize_git_path(&output))),
        Ok(_) | Err(GitError::CommandFailed { .. }) => Err(GitError::NotARepo),
        Err(err) => Err(err),
    }
}

/// Retrieve a git configuration value, `None` when unset or empty.
pub fn config_value(key: &str, cwd: &Path) -> Option<String> {
    git_command(&["config", key], cwd)
        .ok()
        .filter(|value| !value.is_empty())
}

/// The configured git identity as `Name <email>`.
///
/// Falls back to just the name or just the email when only one is set.
///
/// # Errors
///
/// Returns [`GitError::NoIdentity`] when neither is configured.
pub fn user_identity(cwd: &Path) -> Result<String> {
    let name = config_value("user.name", cwd);
    let email = config_value("user.email", cwd);
    match (name, email) {
        (Some(name), Some(email)) => Ok(format!("{name} <{email}>")),
        (Some(name), None) => Ok(name),
        (None, Some(email)) => Ok(email),
        (None, None) => Err(GitError::NoIdentity),
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Normalize git paths for Windows compatibility.
///
/// Git on Windows may return MSYS-style paths like `/c/Users/...` or forward-
/// slash paths like `C:/Users/...`. This function converts them to native
/// format.
fn normalize_git_path(path: &str) -> String {
    // On non-Windows, return as-is.
    if std::path::MAIN_SEPARATOR != '\\' {
        return path.to_string();
    }

    let path = path.trim();

    // Convert /c/Users/... to C:\Users\...
    if path.len() >= 3
        && path.as_bytes()[0] == b'/'
        && path.as_bytes()[2] == b'/'
        && path.as_bytes()[1].is_ascii_alphabetic()
    {
        let drive = path.as_bytes()[1].to_ascii_uppercase() as char;
        let rest = &path[2..];
        return format!("{drive}:{}", rest.replace('/', "\\"));
    }

    // Convert C:/Users/... to C:\Users\...
    path.replace('/', "\\")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    /// A fresh repository with a local identity and one commit.
    pub(crate) fn init_repo() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path();
        git_command(&["init", "-q"], cwd).unwrap();
        git_command(&["config", "user.name", "Test User"], cwd).unwrap();
        git_command(&["config", "user.email", "test@example.com"], cwd).unwrap();
        git_command(&["config", "commit.gpgsign", "false"], cwd).unwrap();
        std::fs::write(cwd.join("README"), "readme\n").unwrap();
        git_command(&["add", "README"], cwd).unwrap();
        git_command(&["commit", "-q", "-m", "initial"], cwd).unwrap();
        dir
    }

    #[test]
    fn test_git_root_from_subdirectory() {
        let repo = init_repo();
        let sub = repo.path().join("a").join("b");
        std::fs::create_dir_all(&sub).unwrap();

        let root = git_root(&sub).unwrap();
        assert_eq!(
            root.canonicalize().unwrap(),
            repo.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_git_root_outside_repo() {
        let dir = tempfile::tempdir().unwrap();
        // Temp dirs are normally outside any repository; if one is nested
        // in a checkout the lookup simply succeeds.
        if let Err(err) = git_root(dir.path()) {
            assert!(matches!(err, GitError::NotARepo));
        }
    }

    #[test]
    fn test_user_identity_from_local_config() {
        let repo = init_repo();
        assert_eq!(
            user_identity(repo.path()).unwrap(),
            "Test User <test@example.com>"
        );
    }

    #[test]
    fn test_normalize_git_path_unix() {
        // On Unix, this should be a no-op.
        if std::path::MAIN_SEPARATOR != '\\' {
            assert_eq!(normalize_git_path("/home/user/repo"), "/home/user/repo");
        }
    }

    #[test]
    fn test_normalize_git_path_windows_msys() {
        // Test MSYS-style path conversion (only meaningful on Windows).
        if std::path::MAIN_SEPARATOR == '\\' {
            assert_eq!(
                normalize_git_path("/c/Users/test/repo"),
                "C:\\Users\\test\\repo"
            );
        }
    }
}
