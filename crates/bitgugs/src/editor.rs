//! Launching the user's editor on a freshly created issue.

use std::path::Path;
use std::process::Command;

/// Line the cursor starts on: the `description` line of a new record.
const START_LINE: &str = "+4";

/// Opens `path` in `editor` (a command line, split on whitespace) at the
/// description line and waits for it.
///
/// Failures are logged as warnings; the issue file already exists.
pub fn open(editor: &str, path: &Path) {
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        tracing::warn!("no editor configured");
        return;
    };

    tracing::debug!(%editor, path = %path.display(), "opening editor");
    match Command::new(program).args(parts).arg(START_LINE).arg(path).status() {
        Ok(status) if status.success() => {}
        Ok(status) => tracing::warn!(%editor, %status, "editor exited unsuccessfully"),
        Err(err) => tracing::warn!(%editor, %err, "could not start editor"),
    }
}
