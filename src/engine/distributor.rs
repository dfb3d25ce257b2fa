use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::domain::RunConfig;
use crate::error::{AppError, AppResult, EngineError};
use crate::http::RequestExecutor;
use crate::metrics::{ResultTally, TallySnapshot};
use crate::shutdown::{ShutdownReceiver, ShutdownSender};

use super::completion::CompletionCounter;
use super::queue::WorkQueue;

/// Result of driving one run to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub tally: TallySnapshot,
    /// Units handed out by the queue. Equals the planned total unless the
    /// run was stopped early.
    pub claimed: u64,
    pub interrupted: bool,
}

/// Spreads `total_requests` units over a fixed pool of workers.
///
/// Each worker claims one unit at a time from a shared [`WorkQueue`], so the
/// split is exact for any total and any concurrency, and a slow request
/// never holds back work another worker could pick up.
pub struct WorkDistributor<E: ?Sized> {
    executor: Arc<E>,
}

impl<E> WorkDistributor<E>
where
    E: RequestExecutor + ?Sized + 'static,
{
    #[must_use]
    pub const fn new(executor: Arc<E>) -> Self {
        Self { executor }
    }

    /// Executes every unit of the run and returns once all of them are
    /// recorded.
    ///
    /// A stop signal on `shutdown_tx`, or the configured deadline, closes the
    /// queue: units already in flight finish and are recorded, no new unit is
    /// started.
    ///
    /// # Errors
    ///
    /// Returns an error if a worker dies or cannot record its latency, and
    /// when the recorded outcomes do not match the claimed units.
    pub async fn run(
        &self,
        config: &RunConfig,
        shutdown_tx: &ShutdownSender,
    ) -> AppResult<Distribution> {
        let tally = Arc::new(ResultTally::new()?);
        if config.total_requests == 0 {
            debug!("No requests planned; skipping worker launch.");
            return Ok(Distribution {
                tally: tally.snapshot(),
                claimed: 0,
                interrupted: false,
            });
        }

        let queue = Arc::new(WorkQueue::new(config.total_requests));
        let completion = Arc::new(CompletionCounter::new());
        let url = Arc::new(config.url.clone());
        let watcher = spawn_stop_watcher(
            Arc::clone(&queue),
            config.deadline,
            shutdown_tx.subscribe(),
        );

        let worker_count = config.worker_count();
        debug!(
            "Launching {} workers for {} requests.",
            worker_count, config.total_requests
        );
        let mut workers = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            workers.push(tokio::spawn(worker_loop(
                Arc::clone(&self.executor),
                Arc::clone(&url),
                Arc::clone(&queue),
                Arc::clone(&tally),
                Arc::clone(&completion),
            )));
        }

        let mut first_failure = None;
        for (worker, handle) in workers.into_iter().enumerate() {
            let failure = match handle.await {
                Ok(Ok(())) => None,
                Ok(Err(err)) => {
                    error!("Worker {} failed: {}", worker, err);
                    Some(err)
                }
                Err(source) => {
                    error!("Worker {} stopped abnormally: {}", worker, source);
                    Some(EngineError::WorkerFailed { worker, source })
                }
            };
            if first_failure.is_none() {
                first_failure = failure;
            }
        }
        watcher.abort();
        if let Some(err) = first_failure {
            return Err(AppError::engine(err));
        }

        let claimed = queue.claimed();
        let snapshot = tally.snapshot();
        if completion.finished() != claimed
            || snapshot.total_completed != claimed
            || !snapshot.is_consistent()
        {
            error!(
                "Completion mismatch: claimed {}, finished {}, recorded {}.",
                claimed,
                completion.finished(),
                snapshot.total_completed
            );
            return Err(AppError::engine(EngineError::IncompleteRun {
                claimed,
                recorded: snapshot.total_completed,
            }));
        }

        Ok(Distribution {
            tally: snapshot,
            claimed,
            interrupted: claimed < config.total_requests,
        })
    }
}

async fn worker_loop<E>(
    executor: Arc<E>,
    url: Arc<Url>,
    queue: Arc<WorkQueue>,
    tally: Arc<ResultTally>,
    completion: Arc<CompletionCounter>,
) -> Result<(), EngineError>
where
    E: RequestExecutor + ?Sized,
{
    while queue.try_claim() {
        let started = Instant::now();
        let outcome = executor.execute(&url).await;
        if let Err(err) = tally.record(outcome, started.elapsed()) {
            // The claimed unit can never be recorded; stop the others too.
            queue.close();
            return Err(err);
        }
        completion.mark_finished();
    }
    Ok(())
}

/// Closes the queue on deadline or stop signal, whichever comes first.
///
/// A closed broadcast channel means nobody can ask for a stop anymore, so it
/// is not treated as one.
fn spawn_stop_watcher(
    queue: Arc<WorkQueue>,
    deadline: Option<Duration>,
    mut shutdown_rx: ShutdownReceiver,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let deadline_reached = async {
            match deadline {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        let stop_requested = async {
            match shutdown_rx.recv().await {
                Ok(()) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            () = deadline_reached => {
                info!("Run deadline reached; no new requests will be started.");
            }
            () = stop_requested => {
                info!("Stop requested; waiting for in-flight requests.");
            }
        }
        queue.close();
    })
}
