use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::results::SearchPhase;

/// Handle for aborting a running search from outside.
///
/// Cheap to clone; hand a clone to the search and keep one to call
/// [`CancelToken::cancel`] from another thread. Distinct from the
/// match-found termination flag so the sealed output can tell
/// "cancelled" apart from "exhausted".
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Shared state arbitrating a single search across the worker pool.
///
/// Holds the only mutable objects workers share: the attempt counter,
/// the write-once termination flag, and the winning-candidate slot.
/// The flag is claimed by compare-and-set; only the winning worker may
/// touch the slot, so there is exactly one recorded winner no matter
/// how the pool schedules chunks.
#[derive(Debug, Clone)]
pub struct SearchCoordinator {
    finished: Arc<AtomicBool>,
    cancel: CancelToken,
    attempts: Arc<AtomicU64>,
    winner: Arc<Mutex<Option<(String, SearchPhase)>>>,
}

impl SearchCoordinator {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            finished: Arc::new(AtomicBool::new(false)),
            cancel,
            attempts: Arc::new(AtomicU64::new(0)),
            winner: Arc::new(Mutex::new(None)),
        }
    }

    /// Counts one hashed (or skipped-as-unencodable) candidate
    pub fn record_attempt(&self) -> u64 {
        self.attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// True once a match is recorded or the caller cancelled; producers
    /// and workers check this before scheduling or hashing more work
    pub fn should_stop(&self) -> bool {
        self.finished.load(Ordering::Acquire) || self.cancel.is_cancelled()
    }

    pub fn is_found(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Attempts to record `candidate` as the search winner.
    ///
    /// The compare-and-set on the termination flag is the tie-break: the
    /// worker that flips it false→true owns the result slot, every other
    /// matching worker returns `false` and discards its match.
    pub fn try_claim(&self, candidate: &str, phase: SearchPhase) -> bool {
        if self
            .finished
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Lost the claim race for candidate {:?}", candidate);
            return false;
        }
        let mut slot = self.winner.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some((candidate.to_string(), phase));
        true
    }

    /// The recorded winner, if any
    pub fn winner(&self) -> Option<(String, SearchPhase)> {
        self.winner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
