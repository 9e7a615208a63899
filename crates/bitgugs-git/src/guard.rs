//! Protection of uncommitted work around a committing operation.
//!
//! [`WorkingTreeGuard::engage`] stashes every local change (tracked and
//! untracked) and resets the tree, so the operation commits only its own
//! edits. Releasing the guard puts the changes back on top of the new
//! commit. Release happens exactly once: explicitly via
//! [`WorkingTreeGuard::release`], or from `Drop` on early return or panic.
//! A snapshot that cannot be reapplied is never discarded; the tree is reset
//! to the new commit instead, leaving the snapshot as the one copy of the
//! local changes.

use std::fmt;

use crate::commands::{GitError, Result};
use crate::vcs::{SnapshotId, Vcs};

/// Outcome of releasing a guard.
#[derive(Debug)]
pub enum Restore {
    /// There were no local changes to put back.
    Clean,
    /// The snapshot was reapplied and discarded.
    Reapplied {
        snapshot: SnapshotId,
        /// Whether the staged state could be restored as well.
        with_index: bool,
    },
    /// Reapplying failed; the snapshot is still stored for manual recovery.
    Kept { snapshot: SnapshotId, error: GitError },
}

impl Restore {
    /// The snapshot left behind, if reapplication failed.
    pub fn kept(&self) -> Option<&SnapshotId> {
        match self {
            Self::Kept { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }
}

impl fmt::Display for Restore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => f.write_str("no local changes to restore"),
            Self::Reapplied { snapshot, .. } => write!(f, "restored local changes from {snapshot}"),
            Self::Kept { snapshot, error } => write!(
                f,
                "could not restore local changes ({error}); the working tree was reset to \
                 the new commit and the changes are kept in stash commit {snapshot}, \
                 recover them with `git stash apply {snapshot}`"
            ),
        }
    }
}

/// Holds local changes aside while an operation runs on a clean tree.
pub struct WorkingTreeGuard<'a, V: Vcs + ?Sized> {
    vcs: &'a V,
    snapshot: Option<SnapshotId>,
    released: bool,
}

impl<'a, V: Vcs + ?Sized> WorkingTreeGuard<'a, V> {
    /// Snapshots local changes and resets the working tree.
    ///
    /// # Errors
    ///
    /// Fails without touching anything if the snapshot cannot be taken. If
    /// the reset fails after a snapshot was taken, the snapshot is reapplied
    /// before the error is returned.
    pub fn engage(vcs: &'a V, message: &str) -> Result<Self> {
        let snapshot = vcs.snapshot(message)?;
        let mut guard = Self {
            vcs,
            snapshot,
            released: false,
        };

        if let Some(snapshot) = guard.snapshot.clone() {
            tracing::debug!(%snapshot, "stashed local changes");
            if let Err(err) = vcs.reset() {
                let restore = guard.restore();
                tracing::warn!(%restore, "reset after snapshot failed");
                return Err(err);
            }
        }
        Ok(guard)
    }

    /// The snapshot held by this guard, if there were local changes.
    pub fn snapshot(&self) -> Option<&SnapshotId> {
        self.snapshot.as_ref()
    }

    /// Reapplies the snapshot and reports what happened.
    pub fn release(mut self) -> Restore {
        self.restore()
    }

    fn restore(&mut self) -> Restore {
        self.released = true;
        let Some(snapshot) = self.snapshot.take() else {
            return Restore::Clean;
        };

        let applied = match self.vcs.reapply(&snapshot, true) {
            Ok(()) => Ok(true),
            Err(err) => {
                tracing::debug!(%snapshot, %err, "reapply with index failed, retrying without");
                self.discard_partial_apply(&snapshot);
                self.vcs.reapply(&snapshot, false).map(|()| false)
            }
        };

        match applied {
            Ok(with_index) => {
                if let Err(err) = self.vcs.drop_snapshot(&snapshot) {
                    tracing::warn!(%snapshot, %err, "local changes restored but stash entry not dropped");
                }
                Restore::Reapplied {
                    snapshot,
                    with_index,
                }
            }
            Err(error) => {
                tracing::error!(%snapshot, %error, "local changes could not be reapplied");
                self.discard_partial_apply(&snapshot);
                Restore::Kept { snapshot, error }
            }
        }
    }

    /// Drops whatever a failed apply left behind, conflict markers
    /// included, so the tree matches the last commit again. The snapshot
    /// stays stored.
    fn discard_partial_apply(&self, snapshot: &SnapshotId) {
        if let Err(err) = self.vcs.reset() {
            tracing::warn!(%snapshot, %err, "could not reset after failed reapply");
        }
    }
}

impl<V: Vcs + ?Sized> Drop for WorkingTreeGuard<'_, V> {
    fn drop(&mut self) {
        if !self.released {
            let restore = self.restore();
            if let Some(snapshot) = restore.kept() {
                eprintln!("warning: local changes kept in stash commit {snapshot}");
            }
        }
    }
}
