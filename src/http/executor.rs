use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Url};
use tracing::debug;

use crate::metrics::{RequestOutcome, TransportFailure};

/// Performs one GET against a URL and classifies the result.
///
/// Implementations must never fail the run: every failure mode is folded
/// into a [`RequestOutcome`].
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, url: &Url) -> RequestOutcome;
}

/// Executor backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, url: &Url) -> RequestOutcome {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(err) => {
                let failure = classify_error(&err);
                debug!("Request to {} failed ({}): {}", url, failure.as_str(), err);
                return RequestOutcome::TransportError(failure);
            }
        };

        let status = response.status().as_u16();
        // The response is consumed here, so the connection goes back to the
        // pool (or is closed) before the worker claims its next unit.
        match drain_response_body(response).await {
            Ok(_) => RequestOutcome::from_status(status),
            Err(err) => {
                debug!("Reading body from {} failed: {}", url, err);
                RequestOutcome::TransportError(classify_error(&err))
            }
        }
    }
}

pub(super) fn classify_error(err: &reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::Timeout
    } else if err.is_connect() {
        TransportFailure::Connect
    } else if err.is_body() || err.is_decode() {
        TransportFailure::Body
    } else {
        TransportFailure::Other
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
