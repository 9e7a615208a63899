//! The issue directory inside a repository.
//!
//! Every issue lives in exactly one `<id>-<slug>.txt` file under
//! `<repo-root>/<issue-dir>`. The store locates, enumerates and creates
//! those files; it never deletes or rewrites them.

use std::cell::OnceCell;
use std::io;
use std::path::{Path, PathBuf};

use crate::idgen::{self, ISSUE_EXTENSION};
use crate::record::{self, RecordError};

/// Default name of the issue directory below the repository root.
pub const DEFAULT_ISSUE_DIR: &str = "issues";

/// Errors raised by the issue store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Issue {id} is not a single issue: found {found:?}")]
    NotSingle { id: String, found: Vec<String> },

    #[error("issue {0} already exists")]
    AlreadyExists(String),

    #[error("invalid issue id {0:?}")]
    InvalidId(String),

    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Access to the issue files of one repository.
#[derive(Debug)]
pub struct IssueStore {
    root: PathBuf,
    dir_name: String,
    first_id: u64,
    dir: OnceCell<PathBuf>,
}

impl IssueStore {
    /// Creates a store for `<root>/<dir_name>`.
    ///
    /// The directory is not touched until the first operation needs it.
    pub fn new(root: impl Into<PathBuf>, dir_name: impl Into<String>, first_id: u64) -> Self {
        Self {
            root: root.into(),
            dir_name: dir_name.into(),
            first_id,
            dir: OnceCell::new(),
        }
    }

    /// The repository root this store belongs to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Makes sure the issue directory exists and returns it.
    ///
    /// Idempotent. The path is resolved once per store; the directory is
    /// recreated if something (such as `git stash --include-untracked`)
    /// removed it in the meantime.
    pub fn ensure_directory(&self) -> Result<&Path> {
        let dir = self.dir.get_or_init(|| self.root.join(&self.dir_name));
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "creating issue directory");
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(dir.as_path())
    }

    /// Names of all issue files (`*-*.txt`), sorted.
    pub fn list_all(&self) -> Result<Vec<String>> {
        let dir = self.ensure_directory()?;
        let entries = std::fs::read_dir(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if is_issue_file_name(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Resolves `id` to its file, requiring exactly one `<id>-*.txt` match.
    pub fn resolve(&self, id: &str) -> Result<PathBuf> {
        let dir = self.ensure_directory()?;
        let found = self.matching(id)?;
        match found.as_slice() {
            [single] => Ok(dir.join(single)),
            _ => Err(StoreError::NotSingle {
                id: id.to_string(),
                found,
            }),
        }
    }

    /// File names matching `<id>-*.txt`.
    fn matching(&self, id: &str) -> Result<Vec<String>> {
        let prefix = format!("{id}-");
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|name| name.starts_with(&prefix))
            .collect())
    }

    /// Checks that `id` is well formed and not used by any issue file yet.
    pub fn check_new_id(&self, id: &str) -> Result<()> {
        if !idgen::is_valid_id(id) {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        if !self.matching(id)?.is_empty() {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }
        Ok(())
    }

    /// The next automatic numeric id.
    pub fn next_auto_id(&self) -> Result<String> {
        Ok(idgen::next_id(self.list_all()?, self.first_id))
    }

    /// Full path of the file for a new issue.
    pub fn build_filename<S: AsRef<str>>(&self, id: &str, title_words: &[S]) -> Result<PathBuf> {
        let dir = self.ensure_directory()?;
        Ok(dir.join(idgen::issue_file_name(id, title_words)))
    }

    /// Creates the record of a new issue and returns its path.
    ///
    /// Writes `id`, `title`, `status` and an empty `description`. Fails if
    /// a file for `id` already exists, keeping ids unique per directory.
    pub fn create<S: AsRef<str>>(&self, id: &str, title_words: &[S], status: &str) -> Result<PathBuf> {
        self.check_new_id(id)?;

        let path = self.build_filename(id, title_words)?;
        let title = title_words
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        let text = record::format_fields([
            ("id", id),
            ("title", title.as_str()),
            ("status", status),
            ("description", ""),
        ])?;
        record::append(&path, &text)?;
        tracing::debug!(path = %path.display(), "created issue");
        Ok(path)
    }
}

/// Whether `name` looks like an issue file (`*-*.txt`, not hidden).
fn is_issue_file_name(name: &str) -> bool {
    !name.starts_with('.')
        && name
            .strip_suffix(ISSUE_EXTENSION)
            .is_some_and(|stem| stem.contains('-'))
}
