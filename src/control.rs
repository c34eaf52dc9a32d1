//! Handles shared between a running search and its caller.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag.
///
/// Clones share the same flag. The producer checks it before publishing each
/// section and workers check it at every dequeue, so a cancelled search stops
/// after the sections already in flight.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Live counters for a running search, safe to read from any thread.
#[derive(Debug, Default)]
pub struct SearchProgress {
    sections_total: AtomicU64,
    sections_done: AtomicU64,
    matches: AtomicU64,
}

impl SearchProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin(&self, sections_total: u64) {
        self.sections_total.store(sections_total, Ordering::Relaxed);
        self.sections_done.store(0, Ordering::Relaxed);
        self.matches.store(0, Ordering::Relaxed);
    }

    pub(crate) fn section_done(&self, matches: usize) {
        self.matches.fetch_add(matches as u64, Ordering::Relaxed);
        self.sections_done.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sections_total(&self) -> u64 {
        self.sections_total.load(Ordering::Relaxed)
    }

    pub fn sections_done(&self) -> u64 {
        self.sections_done.load(Ordering::Relaxed)
    }

    /// Placements at or above the threshold found so far.
    pub fn matches(&self) -> u64 {
        self.matches.load(Ordering::Relaxed)
    }

    /// Completed fraction in `[0, 1]`; zero before the search has begun.
    pub fn fraction(&self) -> f64 {
        let total = self.sections_total();
        if total == 0 {
            return 0.0;
        }
        self.sections_done().min(total) as f64 / total as f64
    }
}
