use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Worker {worker} stopped abnormally: {source}")]
    WorkerFailed {
        worker: usize,
        #[source]
        source: tokio::task::JoinError,
    },
    #[error("Run finished with {recorded} recorded outcomes for {claimed} claimed requests.")]
    IncompleteRun { claimed: u64, recorded: u64 },
    #[error("Latency histogram unavailable: {source}")]
    Histogram {
        #[source]
        source: hdrhistogram::CreationError,
    },
    #[error("Run aborted by {signal} before in-flight requests finished.")]
    Aborted { signal: &'static str },
    #[error("Failed to record latency: {source}")]
    LatencyRecord {
        #[source]
        source: hdrhistogram::RecordError,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
