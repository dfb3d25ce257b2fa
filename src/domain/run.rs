use std::time::Duration;

use reqwest::Url;

use crate::args::PositiveUsize;
use crate::http::ClientSettings;

/// Immutable input of one load test.
///
/// Built once by the CLI/config layer, which has already checked that the
/// URL is an absolute http(s) address and that concurrency is at least one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub url: Url,
    pub total_requests: u64,
    pub concurrency: PositiveUsize,
    /// Stop claiming new work after this long. In-flight requests still finish.
    pub deadline: Option<Duration>,
    pub client: ClientSettings,
}

impl RunConfig {
    #[must_use]
    pub const fn new(url: Url, total_requests: u64, concurrency: PositiveUsize) -> Self {
        Self {
            url,
            total_requests,
            concurrency,
            deadline: None,
            client: ClientSettings {
                request_timeout: None,
                connect_timeout: None,
            },
        }
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    #[must_use]
    pub fn with_client(mut self, client: ClientSettings) -> Self {
        self.client = client;
        self
    }

    /// Workers worth launching: never more than there are requests.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        let concurrency = self.concurrency.get();
        usize::try_from(self.total_requests).map_or(concurrency, |total| total.min(concurrency))
    }
}
