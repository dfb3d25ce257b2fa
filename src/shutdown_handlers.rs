use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::shutdown::{ShutdownReceiver, ShutdownSender};

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// Signals delivered faster than the handler reacts are dropped past this.
const SIGNAL_QUEUE_CAPACITY: usize = 4;

/// Watches Ctrl+C (and SIGTERM on unix) for the lifetime of a run.
///
/// The first signal broadcasts a stop on `shutdown_tx`, so in-flight requests
/// drain and the report is still written. A second signal resolves the
/// returned handle with the signal's name; the caller is expected to abandon
/// the run then. The handle never resolves otherwise and must be aborted once
/// the run is over.
pub fn setup_signal_shutdown_handler(
    shutdown_tx: &ShutdownSender,
) -> tokio::task::JoinHandle<&'static str> {
    let shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        let (signal_tx, signal_rx) = mpsc::channel(SIGNAL_QUEUE_CAPACITY);
        let shutdown_rx = shutdown_tx.subscribe();
        let abort = tokio::select! {
            () = forward_os_signals(&signal_tx) => None,
            second = escalate_signals(signal_rx, &shutdown_tx, shutdown_rx) => second,
        };
        match abort {
            Some(signal) => signal,
            None => std::future::pending().await,
        }
    })
}

/// Turns incoming signals into a graceful stop, then into an abort.
///
/// Returns the name of the signal that should abort the run, or `None` when
/// the signal source goes away first. A stop broadcast by someone else counts
/// as the first step, so a single signal after it aborts.
async fn escalate_signals(
    mut signals: mpsc::Receiver<&'static str>,
    shutdown_tx: &ShutdownSender,
    mut shutdown_rx: ShutdownReceiver,
) -> Option<&'static str> {
    tokio::select! {
        biased;
        _ = shutdown_rx.recv() => {
            debug!("Stop already requested; the next signal aborts the run.");
        }
        first = signals.recv() => {
            let signal = first?;
            info!(
                "Received {}, waiting for in-flight requests. Send it again to abort.",
                signal
            );
            drop(shutdown_tx.send(()));
        }
    }
    signals.recv().await
}

/// Feeds OS signals into `signal_tx` until the receiver is gone.
async fn forward_os_signals(signal_tx: &mpsc::Sender<&'static str>) {
    #[cfg(unix)]
    let mut term_signal = match signal(SignalKind::terminate()) {
        Ok(term) => Some(term),
        Err(err) => {
            warn!("Failed to register SIGTERM handler: {}", err);
            None
        }
    };

    loop {
        #[cfg(unix)]
        let received = tokio::select! {
            result = tokio::signal::ctrl_c() => result.map(|()| "Ctrl+C"),
            () = next_term_signal(&mut term_signal) => Ok("SIGTERM"),
        };
        #[cfg(not(unix))]
        let received = tokio::signal::ctrl_c().await.map(|()| "Ctrl+C");

        let signal_name = match received {
            Ok(name) => name,
            Err(err) => {
                warn!("Failed to listen for Ctrl+C: {}", err);
                return;
            }
        };
        if signal_tx.send(signal_name).await.is_err() {
            return;
        }
    }
}

#[cfg(unix)]
async fn next_term_signal(term_signal: &mut Option<Signal>) {
    let delivered = match term_signal.as_mut() {
        Some(term) => term.recv().await,
        None => None,
    };
    if delivered.is_none() {
        std::future::pending::<()>().await;
    }
}
