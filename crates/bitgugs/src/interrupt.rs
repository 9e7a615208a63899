//! Ctrl-C handling.
//!
//! Outside a guarded section an interrupt ends the process at once. While a
//! [`Deferral`] is alive the interrupt is only recorded, so the working-tree
//! guard can put local changes back before the process exits.

use std::sync::atomic::{AtomicBool, Ordering};

/// Exit status for a process ended by SIGINT.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

static DEFERRING: AtomicBool = AtomicBool::new(false);
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Installs the process-wide Ctrl-C handler.
pub fn install() {
    if let Err(err) = ctrlc::set_handler(|| {
        if DEFERRING.load(Ordering::SeqCst) {
            INTERRUPTED.store(true, Ordering::SeqCst);
        } else {
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    }) {
        tracing::warn!(%err, "could not install Ctrl-C handler");
    }
}

/// Defers Ctrl-C until dropped.
#[must_use = "interrupts are only deferred while the value is alive"]
pub struct Deferral(());

impl Deferral {
    pub fn begin() -> Self {
        DEFERRING.store(true, Ordering::SeqCst);
        Self(())
    }
}

impl Drop for Deferral {
    fn drop(&mut self) {
        DEFERRING.store(false, Ordering::SeqCst);
    }
}

/// Whether Ctrl-C arrived during a deferral.
pub fn was_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deferral_toggles_flag() {
        {
            let _deferral = Deferral::begin();
            assert!(DEFERRING.load(Ordering::SeqCst));
        }
        assert!(!DEFERRING.load(Ordering::SeqCst));
        assert!(!was_interrupted());
    }
}
