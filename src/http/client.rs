use std::time::Duration;

use reqwest::Client;
use tracing::error;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, HttpError};

/// Client knobs that survive into the core. Everything else stays at the
/// reqwest defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientSettings {
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

/// Builds the pooled client shared by every worker.
///
/// # Errors
///
/// Returns an error when the TLS backend or client cannot be initialised.
pub fn build_client(settings: ClientSettings) -> AppResult<Client> {
    let mut client_builder = Client::builder().user_agent(DEFAULT_USER_AGENT);

    if let Some(timeout) = settings.request_timeout {
        client_builder = client_builder.timeout(timeout);
    }
    if let Some(timeout) = settings.connect_timeout {
        client_builder = client_builder.connect_timeout(timeout);
    }

    match client_builder.build() {
        Ok(client) => Ok(client),
        Err(err) => {
            error!("Failed to build HTTP client: {}", err);
            Err(AppError::http(HttpError::BuildClientFailed { source: err }))
        }
    }
}
