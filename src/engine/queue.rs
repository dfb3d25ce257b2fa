use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Shared pool of unclaimed work units.
///
/// Every successful [`WorkQueue::try_claim`] hands out exactly one unit, so
/// the number of successful claims can never exceed the initial size no
/// matter how many workers race on it.
#[derive(Debug)]
pub struct WorkQueue {
    remaining: AtomicU64,
    claimed: AtomicU64,
    closed: AtomicBool,
}

impl WorkQueue {
    #[must_use]
    pub const fn new(total: u64) -> Self {
        Self {
            remaining: AtomicU64::new(total),
            claimed: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Claims one unit. Returns `false` once the queue is empty or closed.
    pub fn try_claim(&self) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        loop {
            let current = self.remaining.load(Ordering::Relaxed);
            let Some(next) = current.checked_sub(1) else {
                return false;
            };
            if self
                .remaining
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                self.claimed.fetch_add(1, Ordering::Relaxed);
                return true;
            }
        }
    }

    /// Stops handing out units. Units already claimed are unaffected.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn claimed(&self) -> u64 {
        self.claimed.load(Ordering::Relaxed)
    }
}
