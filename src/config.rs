//! Tuning knobs for the search coordinator.

use std::sync::Arc;

use crate::control::{CancelToken, SearchProgress};
use crate::error::SearchError;

/// Capacity of both the section queue and the result queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Options for [`search_with`](crate::search_with).
///
/// The worker count is passed in rather than read from the machine inside
/// the coordinator, so tests can pin it.
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Number of section workers.
    pub workers: usize,
    /// Bound of the section and result queues.
    pub queue_capacity: usize,
    pub cancel: CancelToken,
    pub progress: Option<Arc<SearchProgress>>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            workers: rayon::current_num_threads(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            cancel: CancelToken::default(),
            progress: None,
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<SearchProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), SearchError> {
        if self.workers == 0 {
            return Err(SearchError::InvalidOptions(
                "worker count must be at least 1".into(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(SearchError::InvalidOptions(
                "queue capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
