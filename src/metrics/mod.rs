//! Request outcomes, latency histograms, and the shared result tally.
mod histogram;
mod outcome;
mod tally;

#[cfg(test)]
mod tests;

pub use histogram::{LatencyHistogram, LatencySummary};
pub use outcome::{RequestOutcome, TransportFailure};
pub use tally::{ResultTally, TallySnapshot};
