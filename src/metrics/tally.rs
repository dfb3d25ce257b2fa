use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::EngineError;

use super::histogram::{LatencyHistogram, LatencySummary};
use super::outcome::{RequestOutcome, TransportFailure};

/// Shared aggregate of every outcome recorded during a run.
///
/// Scalar counters are lock-free. The status map and the latency histogram
/// each sit behind their own mutex, so two workers can never read-modify-write
/// the same status key concurrently. Locks are only held for a single update
/// and never across an `.await`.
///
/// A worker that panics while holding one of the locks cannot leave the data
/// half-written (every critical section is a single increment), so poisoned
/// locks are recovered instead of propagated.
#[derive(Debug)]
pub struct ResultTally {
    total_completed: AtomicU64,
    total_ok: AtomicU64,
    transport_errors: AtomicU64,
    timeouts: AtomicU64,
    status_counts: Mutex<BTreeMap<u16, u64>>,
    latencies: Mutex<LatencyHistogram>,
}

impl ResultTally {
    /// Creates an empty tally.
    ///
    /// # Errors
    ///
    /// Returns an error if the latency histogram cannot be allocated.
    pub fn new() -> Result<Self, EngineError> {
        Ok(Self {
            total_completed: AtomicU64::new(0),
            total_ok: AtomicU64::new(0),
            transport_errors: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            status_counts: Mutex::new(BTreeMap::new()),
            latencies: Mutex::new(LatencyHistogram::new()?),
        })
    }

    /// Records one finished request.
    ///
    /// The latency goes in first, so a failed record leaves every counter
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the latency histogram cannot hold the sample.
    pub fn record(&self, outcome: RequestOutcome, latency: Duration) -> Result<(), EngineError> {
        self.latencies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(latency)?;

        match outcome {
            RequestOutcome::Success => {
                self.total_ok.fetch_add(1, Ordering::Relaxed);
            }
            RequestOutcome::Failed(status) => {
                let mut counts = self
                    .status_counts
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                let count = counts.entry(status).or_insert(0);
                *count = count.saturating_add(1);
            }
            RequestOutcome::TransportError(failure) => {
                self.transport_errors.fetch_add(1, Ordering::Relaxed);
                if failure == TransportFailure::Timeout {
                    self.timeouts.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        // Bumped last so a completed count never runs ahead of its class counter.
        self.total_completed.fetch_add(1, Ordering::Release);
        Ok(())
    }

    /// Copies the current state out of the tally.
    ///
    /// Only meaningful once every worker has been joined; the distributor
    /// guarantees that before handing the snapshot to the controller.
    #[must_use]
    pub fn snapshot(&self) -> TallySnapshot {
        let total_completed = self.total_completed.load(Ordering::Acquire);
        let status_counts = self
            .status_counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let latency = self
            .latencies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .summary();
        TallySnapshot {
            total_completed,
            total_ok: self.total_ok.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            status_counts,
            latency,
        }
    }
}

/// Frozen copy of a [`ResultTally`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallySnapshot {
    pub total_completed: u64,
    pub total_ok: u64,
    pub transport_errors: u64,
    /// Subset of `transport_errors`.
    pub timeouts: u64,
    pub status_counts: BTreeMap<u16, u64>,
    pub latency: LatencySummary,
}

impl TallySnapshot {
    #[must_use]
    pub fn non_ok_responses(&self) -> u64 {
        self.status_counts
            .values()
            .fold(0u64, |acc, count| acc.saturating_add(*count))
    }

    /// `total_completed == total_ok + sum(status_counts) + transport_errors`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let accounted = self
            .total_ok
            .saturating_add(self.non_ok_responses())
            .saturating_add(self.transport_errors);
        accounted == self.total_completed && self.timeouts <= self.transport_errors
    }
}
