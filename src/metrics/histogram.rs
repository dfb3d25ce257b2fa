use std::time::Duration;

use hdrhistogram::Histogram;
use serde::Serialize;

use crate::error::EngineError;

/// Significant figures kept by the latency histogram.
const HISTOGRAM_SIGFIG: u8 = 3;

/// Latency distribution of a run, in microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatencySummary {
    pub samples: u64,
    pub min_us: u64,
    pub mean_us: u64,
    pub max_us: u64,
    pub p50_us: u64,
    pub p90_us: u64,
    pub p99_us: u64,
}

#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create an auto-resizing latency histogram.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> Result<Self, EngineError> {
        let hist = Histogram::<u64>::new(HISTOGRAM_SIGFIG)
            .map_err(|err| EngineError::Histogram { source: err })?;
        Ok(Self { hist })
    }

    /// Records one latency sample. Sub-microsecond samples count as 1us.
    ///
    /// The histogram grows to fit the sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be resized to hold the value.
    pub fn record(&mut self, latency: Duration) -> Result<(), EngineError> {
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.hist
            .record(micros.max(1))
            .map_err(|err| EngineError::LatencyRecord { source: err })
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }

    #[must_use]
    pub fn summary(&self) -> LatencySummary {
        if self.count() == 0 {
            return LatencySummary::default();
        }
        LatencySummary {
            samples: self.count(),
            min_us: self.hist.min(),
            mean_us: self.hist.mean().round() as u64,
            max_us: self.hist.max(),
            p50_us: self.hist.value_at_quantile(0.5),
            p90_us: self.hist.value_at_quantile(0.9),
            p99_us: self.hist.value_at_quantile(0.99),
        }
    }
}
