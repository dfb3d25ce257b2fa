use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::domain::RunConfig;
use crate::error::{AppError, AppResult};
use crate::http::RequestExecutor;
use crate::report::{Report, ReportRenderer};
use crate::shutdown::ShutdownSender;

use super::distributor::WorkDistributor;

/// Nanoseconds per millisecond.
const NS_PER_MS: u128 = 1_000_000;

/// Drives one run from configuration to [`Report`].
pub struct RunController<E: ?Sized> {
    distributor: WorkDistributor<E>,
}

impl<E> RunController<E>
where
    E: RequestExecutor + ?Sized + 'static,
{
    #[must_use]
    pub const fn new(executor: Arc<E>) -> Self {
        Self {
            distributor: WorkDistributor::new(executor),
        }
    }

    /// Runs the load test and freezes its results.
    ///
    /// # Errors
    ///
    /// Returns an error when the distributor cannot account for every
    /// claimed request.
    pub async fn run(&self, config: &RunConfig, shutdown_tx: &ShutdownSender) -> AppResult<Report> {
        info!(
            "Sending {} GET requests to {} with concurrency {}.",
            config.total_requests,
            config.url,
            config.concurrency.get()
        );
        let started_at = Utc::now();
        let started = Instant::now();

        let distribution = self.distributor.run(config, shutdown_tx).await?;
        let elapsed = round_to_millis(started.elapsed());

        if distribution.interrupted {
            warn!(
                "Run stopped after {} of {} requests.",
                distribution.claimed, config.total_requests
            );
        }
        info!(
            "Run finished in {}ms: {} completed, {} ok.",
            elapsed.as_millis(),
            distribution.tally.total_completed,
            distribution.tally.total_ok
        );

        Ok(Report::new(
            config,
            started_at,
            elapsed,
            distribution.tally,
            distribution.interrupted,
        ))
    }
}

/// Runs the load test and writes its report.
///
/// The report is only rendered once the whole run has been recorded. A
/// rendering failure is returned as is; the run is never repeated.
///
/// # Errors
///
/// Returns an error when the run fails or the renderer cannot produce output.
pub async fn run_and_render<E>(
    controller: &RunController<E>,
    config: &RunConfig,
    shutdown_tx: &ShutdownSender,
    renderer: &dyn ReportRenderer,
    out: &mut dyn Write,
) -> AppResult<()>
where
    E: RequestExecutor + ?Sized + 'static,
{
    let report = controller.run(config, shutdown_tx).await?;
    if let Err(err) = renderer.render(report, out) {
        error!("Failed to render report: {}", err);
        return Err(AppError::render(err));
    }
    Ok(())
}

/// Rounds half-up to the nearest millisecond.
fn round_to_millis(elapsed: Duration) -> Duration {
    let nanos = elapsed.as_nanos();
    let millis = nanos
        .saturating_add(NS_PER_MS / 2)
        .checked_div(NS_PER_MS)
        .unwrap_or(0);
    Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
}
