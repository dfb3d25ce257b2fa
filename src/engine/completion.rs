use std::sync::atomic::{AtomicU64, Ordering};

/// Counts finished work units, one per recorded outcome.
///
/// Counting units rather than workers means a unit whose request failed is
/// still counted as done.
#[derive(Debug, Default)]
pub(super) struct CompletionCounter {
    finished: AtomicU64,
}

impl CompletionCounter {
    pub(super) const fn new() -> Self {
        Self {
            finished: AtomicU64::new(0),
        }
    }

    pub(super) fn mark_finished(&self) {
        self.finished.fetch_add(1, Ordering::Release);
    }

    pub(super) fn finished(&self) -> u64 {
        self.finished.load(Ordering::Acquire)
    }
}
