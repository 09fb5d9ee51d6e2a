//! Boot readiness shared between the boot sequencer and the mappers.

use portable_atomic::{AtomicBool, Ordering};

/// Whether the startup indications have been queued yet.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Readiness {
    Booting,
    Ready,
}

impl Readiness {
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

/// Handle holding the readiness state.
///
/// Starts out [`Readiness::Booting`] and is flipped once by the boot
/// sequencer. Relaxed ordering: a stale read only affects boot-time
/// indications.
#[derive(Debug, Default)]
pub struct ReadinessFlag {
    ready: AtomicBool,
}

impl ReadinessFlag {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
        }
    }

    /// Current readiness, to be passed into mapper invocations.
    #[must_use]
    pub fn state(&self) -> Readiness {
        if self.ready.load(Ordering::Relaxed) {
            Readiness::Ready
        } else {
            Readiness::Booting
        }
    }

    /// Marks boot as complete.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Relaxed);
    }
}
