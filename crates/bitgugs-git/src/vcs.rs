//! The version-control operations bitgugs needs, and their git binding.
//!
//! Everything above this crate talks to [`Vcs`], so tests can swap in a
//! scripted implementation instead of a real repository.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::commands::{GitError, Result, git_command, git_command_raw};
use crate::gitdir;

/// Identifier of a recoverable snapshot of working-tree changes.
///
/// For git this is the commit id of the stash entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotId(pub String);

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authorship of one line of a file, as reported by blame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineAttribution {
    /// The line content without its terminator.
    pub content: String,
    /// Identity of whoever committed the line.
    pub author: String,
    /// Commit time, seconds since the Unix epoch.
    pub time: i64,
}

/// Version-control operations used by the issue tracker.
pub trait Vcs {
    /// Root directory of the repository.
    fn root(&self) -> Result<PathBuf>;

    /// The configured user identity.
    fn user_identity(&self) -> Result<String>;

    /// Stages `path` for the next commit.
    fn add(&self, path: &Path) -> Result<()>;

    /// Commits the staged changes.
    fn commit(&self, message: &str) -> Result<()>;

    /// Captures all uncommitted changes, tracked and untracked.
    ///
    /// Returns `None` when there was nothing to capture.
    fn snapshot(&self, message: &str) -> Result<Option<SnapshotId>>;

    /// Resets the working tree to the last commit, removing untracked
    /// files. Ignored files are left alone.
    fn reset(&self) -> Result<()>;

    /// Applies a snapshot on top of the working tree, restoring the staged
    /// state too when `with_index` is set. The snapshot itself is kept.
    fn reapply(&self, snapshot: &SnapshotId, with_index: bool) -> Result<()>;

    /// Discards a snapshot that has been reapplied.
    fn drop_snapshot(&self, snapshot: &SnapshotId) -> Result<()>;

    /// Whether `path` appears in any commit reachable from `HEAD`.
    fn has_history(&self, path: &Path) -> Result<bool>;

    /// Per-line attribution of `path` in file order.
    fn blame(&self, path: &Path) -> Result<Vec<LineAttribution>>;
}

/// [`Vcs`] implemented by running the `git` binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    /// Runs git commands from `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        git_command(args, &self.workdir)
    }

    /// The commit currently at the top of the stash, if any.
    fn stash_top(&self) -> Option<String> {
        self.git(&["rev-parse", "-q", "--verify", "refs/stash"])
            .ok()
            .filter(|sha| !sha.is_empty())
    }

    /// The `stash@{n}` selector of the entry whose commit is `snapshot`.
    fn stash_selector(&self, snapshot: &SnapshotId) -> Result<Option<String>> {
        let list = self.git(&["stash", "list", "--format=%H %gd"])?;
        Ok(list.lines().find_map(|line| {
            let (sha, selector) = line.split_once(' ')?;
            (sha == snapshot.0).then(|| selector.to_string())
        }))
    }
}

impl Vcs for GitCli {
    fn root(&self) -> Result<PathBuf> {
        gitdir::git_root(&self.workdir)
    }

    fn user_identity(&self) -> Result<String> {
        gitdir::user_identity(&self.workdir)
    }

    fn add(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy().into_owned();
        self.git(&["add", "--", path.as_str()]).map(drop)
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.git(&["commit", "--quiet", "-m", message]).map(drop)
    }

    fn snapshot(&self, message: &str) -> Result<Option<SnapshotId>> {
        let before = self.stash_top();
        self.git(&["stash", "push", "--include-untracked", "-m", message])?;
        let after = self.stash_top();
        if after.is_none() || after == before {
            tracing::debug!("no local changes to snapshot");
            return Ok(None);
        }
        Ok(after.map(SnapshotId))
    }

    fn reset(&self) -> Result<()> {
        self.git(&["reset", "--hard", "--quiet", "HEAD"])?;
        self.git(&["clean", "-d", "--force", "--quiet"]).map(drop)
    }

    fn reapply(&self, snapshot: &SnapshotId, with_index: bool) -> Result<()> {
        // Not quiet: conflicts are only reported on stdout.
        let mut args = vec!["stash", "apply"];
        if with_index {
            args.push("--index");
        }
        args.push(&snapshot.0);
        self.git(&args).map(drop)
    }

    fn drop_snapshot(&self, snapshot: &SnapshotId) -> Result<()> {
        match self.stash_selector(snapshot)? {
            Some(selector) => self.git(&["stash", "drop", "--quiet", selector.as_str()]).map(drop),
            None => {
                tracing::debug!(%snapshot, "snapshot no longer in stash list");
                Ok(())
            }
        }
    }

    fn has_history(&self, path: &Path) -> Result<bool> {
        let path = path.to_string_lossy().into_owned();
        match self.git(&["log", "-1", "--format=%H", "--", path.as_str()]) {
            Ok(sha) => Ok(!sha.is_empty()),
            // A repository without commits has no history for anything.
            Err(_) if self.git(&["rev-parse", "-q", "--verify", "HEAD"]).is_err() => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn blame(&self, path: &Path) -> Result<Vec<LineAttribution>> {
        let path = path.to_string_lossy().into_owned();
        let out = git_command_raw(
            &["blame", "--line-porcelain", "--", path.as_str()],
            &self.workdir,
        )?;
        parse_line_porcelain(&out)
    }
}

/// Parses `git blame --line-porcelain` output.
///
/// Every line of the file is preceded by a full header block; the content
/// itself is the line starting with a tab. The committer and commit time
/// of each block are attributed to the content line that closes it.
pub fn parse_line_porcelain(output: &str) -> Result<Vec<LineAttribution>> {
    let mut lines = Vec::new();
    let mut committer: Option<&str> = None;
    let mut committer_mail: Option<&str> = None;
    let mut time: Option<i64> = None;

    for line in output.lines() {
        if let Some(content) = line.strip_prefix('\t') {
            let author = match (committer, committer_mail) {
                (Some(name), Some(mail)) => format!("{name} {mail}"),
                (Some(name), None) => name.to_string(),
                _ => return Err(GitError::BlameOutput(format!("no committer for {content:?}"))),
            };
            let committed_at = time
                .ok_or_else(|| GitError::BlameOutput(format!("no commit time for {content:?}")))?;
            lines.push(LineAttribution {
                content: content.to_string(),
                author,
                time: committed_at,
            });
            committer = None;
            committer_mail = None;
            time = None;
            continue;
        }

        let (key, value) = line.split_once(' ').unwrap_or((line, ""));
        match key {
            "committer" => committer = Some(value),
            "committer-mail" => committer_mail = Some(value),
            "committer-time" => {
                let parsed = value
                    .parse()
                    .map_err(|_| GitError::BlameOutput(format!("bad committer-time {value:?}")))?;
                time = Some(parsed);
            }
            _ => {}
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gitdir::tests::init_repo;
    use pretty_assertions::assert_eq;

    const PORCELAIN: &str = "\
4b825dc642cb6eb9a060e54bf8d69288fbee4904 1 1 2
author Ann
author-mail <ann@example.com>
author-time 1700000000
author-tz +0000
committer Ann
committer-mail <ann@example.com>
committer-time 1700000000
committer-tz +0000
summary 1001: created
filename issues/1001-x.txt
\tid: 1001
4b825dc642cb6eb9a060e54bf8d69288fbee4904 2 2
author Ann
author-mail <ann@example.com>
author-time 1700000000
author-tz +0000
committer Ann
committer-mail <ann@example.com>
committer-time 1700000000
committer-tz +0000
summary 1001: created
filename issues/1001-x.txt
\tdescription:\x20
0000000000000000000000000000000000000000 3 3 1
author Not Committed Yet
author-mail <not.committed.yet>
author-time 1700000500
author-tz +0000
committer Not Committed Yet
committer-mail <not.committed.yet>
committer-time 1700000500
committer-tz +0000
summary Version of issues/1001-x.txt from issues/1001-x.txt
previous 4b825dc642cb6eb9a060e54bf8d69288fbee4904 issues/1001-x.txt
filename issues/1001-x.txt
\tstatus: closed
";

    #[test]
    fn parse_porcelain_attributes_each_line() {
        let lines = parse_line_porcelain(PORCELAIN).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].content, "id: 1001");
        assert_eq!(lines[0].author, "Ann <ann@example.com>");
        assert_eq!(lines[0].time, 1_700_000_000);
        assert_eq!(lines[1].content, "description: ");
        assert_eq!(lines[2].author, "Not Committed Yet <not.committed.yet>");
        assert_eq!(lines[2].time, 1_700_000_500);
    }

    #[test]
    fn parse_porcelain_rejects_missing_committer() {
        let err = parse_line_porcelain("abc 1 1 1\ncommitter-time 5\n\tid: 1\n").unwrap_err();
        assert!(matches!(err, GitError::BlameOutput(_)));
    }

    #[test]
    fn snapshot_and_reapply_round_trip() {
        let repo = init_repo();
        let git = GitCli::new(repo.path());
        std::fs::write(repo.path().join("README"), "changed\n").unwrap();
        std::fs::write(repo.path().join("new.txt"), "untracked\n").unwrap();

        let snapshot = git.snapshot("test snapshot").unwrap().expect("snapshot");
        assert_eq!(
            std::fs::read_to_string(repo.path().join("README")).unwrap(),
            "readme\n"
        );
        assert!(!repo.path().join("new.txt").exists());

        git.reset().unwrap();
        git.reapply(&snapshot, true).unwrap();
        git.drop_snapshot(&snapshot).unwrap();

        assert_eq!(
            std::fs::read_to_string(repo.path().join("README")).unwrap(),
            "changed\n"
        );
        assert!(repo.path().join("new.txt").exists());
        assert!(git.stash_top().is_none());
    }

    #[test]
    fn conflicting_reapply_reports_and_reset_discards_it() {
        let repo = init_repo();
        let git = GitCli::new(repo.path());
        let readme = repo.path().join("README");
        std::fs::write(&readme, "readme\nlocal\n").unwrap();
        std::fs::write(repo.path().join("scratch.txt"), "untracked\n").unwrap();
        let snapshot = git.snapshot("test snapshot").unwrap().expect("snapshot");

        std::fs::write(&readme, "readme\nupstream\n").unwrap();
        git.add(&readme).unwrap();
        git.commit("upstream edit").unwrap();

        match git.reapply(&snapshot, false).unwrap_err() {
            GitError::CommandFailed { output, .. } => {
                assert!(!output.is_empty(), "conflict not reported");
            }
            other => panic!("expected CommandFailed, got: {other:?}"),
        }

        git.reset().unwrap();
        assert_eq!(
            std::fs::read_to_string(&readme).unwrap(),
            "readme\nupstream\n"
        );
        assert!(!repo.path().join("scratch.txt").exists());
        assert_eq!(git.stash_top(), Some(snapshot.0.clone()));
    }

    #[test]
    fn history_only_for_committed_paths() {
        let repo = init_repo();
        let git = GitCli::new(repo.path());
        let fresh = repo.path().join("fresh.txt");
        std::fs::write(&fresh, "id: 1\n").unwrap();

        assert!(git.has_history(&repo.path().join("README")).unwrap());
        assert!(!git.has_history(&fresh).unwrap());
    }

    #[test]
    fn snapshot_of_clean_tree_is_none() {
        let repo = init_repo();
        let git = GitCli::new(repo.path());
        assert_eq!(git.snapshot("nothing").unwrap(), None);
    }

    #[test]
    fn add_commit_and_blame() {
        let repo = init_repo();
        let git = GitCli::new(repo.path());
        let file = repo.path().join("1-x.txt");
        std::fs::write(&file, "id: 1\ndescription: \n").unwrap();
        git.add(&file).unwrap();
        git.commit("1: x (created)").unwrap();

        let lines = git.blame(&file).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].content, "id: 1");
        assert_eq!(lines[1].content, "description: ");
        assert_eq!(lines[0].author, "Test User <test@example.com>");
    }

    #[test]
    fn root_and_identity() {
        let repo = init_repo();
        let git = GitCli::new(repo.path());
        assert_eq!(
            git.root().unwrap().canonicalize().unwrap(),
            repo.path().canonicalize().unwrap()
        );
        assert_eq!(git.user_identity().unwrap(), "Test User <test@example.com>");
    }
}
