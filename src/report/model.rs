use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::domain::RunConfig;
use crate::metrics::{LatencySummary, TallySnapshot};

/// Scale factor for percentages rendered with two decimals.
const PERCENT_SCALE: u128 = 10_000;
/// Scale factor for requests-per-second rendered with two decimals.
const RPS_SCALE_PER_MS: u128 = 100_000;

/// Immutable summary of one finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub url: String,
    pub started_at: DateTime<Utc>,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub planned_requests: u64,
    pub concurrency: usize,
    /// Requests that actually completed, whatever their outcome.
    pub total_requests: u64,
    pub total_ok: u64,
    /// Non-200 responses by status code.
    pub status_counts: BTreeMap<u16, u64>,
    pub transport_errors: u64,
    pub timeouts: u64,
    pub interrupted: bool,
    pub latency: LatencySummary,
}

impl Report {
    #[must_use]
    pub fn new(
        config: &RunConfig,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        tally: TallySnapshot,
        interrupted: bool,
    ) -> Self {
        Self {
            url: config.url.to_string(),
            started_at,
            elapsed,
            planned_requests: config.total_requests,
            concurrency: config.concurrency.get(),
            total_requests: tally.total_completed,
            total_ok: tally.total_ok,
            status_counts: tally.status_counts,
            transport_errors: tally.transport_errors,
            timeouts: tally.timeouts,
            interrupted,
            latency: tally.latency,
        }
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }

    #[must_use]
    pub fn non_ok_responses(&self) -> u64 {
        self.status_counts
            .values()
            .fold(0u64, |acc, count| acc.saturating_add(*count))
    }

    /// Share of 200 responses, in hundredths of a percent.
    #[must_use]
    pub fn success_rate_x100(&self) -> u64 {
        if self.total_requests == 0 {
            return 0;
        }
        let scaled = u128::from(self.total_ok)
            .saturating_mul(PERCENT_SCALE)
            .checked_div(u128::from(self.total_requests))
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    }

    /// Completed requests per second, in hundredths.
    #[must_use]
    pub fn avg_rps_x100(&self) -> u64 {
        if self.total_requests == 0 {
            return 0;
        }
        let duration_ms = self.elapsed.as_millis().max(1);
        let scaled = u128::from(self.total_requests)
            .saturating_mul(RPS_SCALE_PER_MS)
            .checked_div(duration_ms)
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    }
}

fn serialize_millis<S>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
