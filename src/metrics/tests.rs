use super::*;
use crate::error::{AppError, AppResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

const THREADS: usize = 8;
const RECORDS_PER_THREAD: u64 = 1_000;

#[test]
fn outcome_from_status_only_treats_200_as_success() -> AppResult<()> {
    if RequestOutcome::from_status(200) != RequestOutcome::Success {
        return Err(AppError::validation("Expected 200 to be Success"));
    }
    if RequestOutcome::from_status(204) != RequestOutcome::Failed(204) {
        return Err(AppError::validation("Expected 204 to be Failed(204)"));
    }
    if RequestOutcome::from_status(500).is_success() {
        return Err(AppError::validation("Expected 500 not to be success"));
    }
    Ok(())
}

#[test]
fn record_routes_each_outcome_to_its_counter() -> AppResult<()> {
    let tally = ResultTally::new()?;
    tally.record(RequestOutcome::Success, Duration::from_millis(3))?;
    tally.record(RequestOutcome::Failed(404), Duration::from_millis(5))?;
    tally.record(RequestOutcome::Failed(404), Duration::from_millis(5))?;
    tally.record(RequestOutcome::Failed(503), Duration::from_millis(7))?;
    tally.record(
        RequestOutcome::TransportError(TransportFailure::Timeout),
        Duration::from_millis(9),
    )?;
    tally.record(
        RequestOutcome::TransportError(TransportFailure::Connect),
        Duration::from_millis(1),
    )?;

    let snapshot = tally.snapshot();
    if snapshot.total_completed != 6 {
        return Err(AppError::validation(format!(
            "Unexpected total_completed: {}",
            snapshot.total_completed
        )));
    }
    if snapshot.total_ok != 1 {
        return Err(AppError::validation("Unexpected total_ok"));
    }
    let expected: BTreeMap<u16, u64> = [(404, 2), (503, 1)].into_iter().collect();
    if snapshot.status_counts != expected {
        return Err(AppError::validation(format!(
            "Unexpected status_counts: {:?}",
            snapshot.status_counts
        )));
    }
    if snapshot.transport_errors != 2 || snapshot.timeouts != 1 {
        return Err(AppError::validation(
            "Expected two transport errors, one of them a timeout",
        ));
    }
    if !snapshot.is_consistent() {
        return Err(AppError::validation("Snapshot should be consistent"));
    }
    Ok(())
}

#[test]
fn concurrent_records_lose_no_updates() -> AppResult<()> {
    let tally = Arc::new(ResultTally::new()?);

    std::thread::scope(|scope| -> AppResult<()> {
        let mut handles = Vec::with_capacity(THREADS);
        for thread_index in 0..THREADS {
            let tally = Arc::clone(&tally);
            handles.push(scope.spawn(move || -> AppResult<()> {
                for seq in 0..RECORDS_PER_THREAD {
                    let outcome = match (seq.wrapping_add(thread_index as u64)) % 4 {
                        0 => RequestOutcome::Success,
                        1 => RequestOutcome::Failed(500),
                        2 => RequestOutcome::Failed(404),
                        _ => RequestOutcome::TransportError(TransportFailure::Other),
                    };
                    tally.record(outcome, Duration::from_micros(seq))?;
                }
                Ok(())
            }));
        }
        for handle in handles {
            handle
                .join()
                .map_err(|_panic| AppError::validation("Recording thread panicked"))??;
        }
        Ok(())
    })?;

    let snapshot = tally.snapshot();
    let total = RECORDS_PER_THREAD * THREADS as u64;
    let quarter = total / 4;
    if snapshot.total_completed != total {
        return Err(AppError::validation(format!(
            "Lost updates: {} of {}",
            snapshot.total_completed, total
        )));
    }
    if snapshot.total_ok != quarter
        || snapshot.status_counts.get(&500) != Some(&quarter)
        || snapshot.status_counts.get(&404) != Some(&quarter)
        || snapshot.transport_errors != quarter
    {
        return Err(AppError::validation(format!(
            "Unexpected distribution: {:?}",
            snapshot
        )));
    }
    if snapshot.latency.samples != total {
        return Err(AppError::validation("Histogram missed samples"));
    }
    if !snapshot.is_consistent() {
        return Err(AppError::validation("Snapshot should be consistent"));
    }
    Ok(())
}

#[test]
fn empty_tally_snapshot_is_all_zero() -> AppResult<()> {
    let snapshot = ResultTally::new()?.snapshot();
    if snapshot != TallySnapshot::default() {
        return Err(AppError::validation(format!(
            "Expected empty snapshot, got {:?}",
            snapshot
        )));
    }
    if !snapshot.is_consistent() {
        return Err(AppError::validation("Empty snapshot should be consistent"));
    }
    Ok(())
}

#[test]
fn inconsistent_snapshot_is_detected() -> AppResult<()> {
    let snapshot = TallySnapshot {
        total_completed: 3,
        total_ok: 1,
        transport_errors: 1,
        ..TallySnapshot::default()
    };
    if snapshot.is_consistent() {
        return Err(AppError::validation("Missing outcome should be detected"));
    }
    Ok(())
}

#[test]
fn latency_summary_is_ordered() -> AppResult<()> {
    let mut histogram = LatencyHistogram::new()?;
    for millis in 1..=100u64 {
        histogram.record(Duration::from_millis(millis))?;
    }
    let summary = histogram.summary();
    if summary.samples != 100 {
        return Err(AppError::validation("Unexpected sample count"));
    }
    let ordered = summary.min_us <= summary.p50_us
        && summary.p50_us <= summary.p90_us
        && summary.p90_us <= summary.p99_us
        && summary.p99_us <= summary.max_us;
    if !ordered {
        return Err(AppError::validation(format!(
            "Percentiles out of order: {:?}",
            summary
        )));
    }
    if summary.min_us < 999 || summary.max_us < 99_000 {
        return Err(AppError::validation(format!(
            "Unexpected bounds: {:?}",
            summary
        )));
    }
    Ok(())
}

#[test]
fn zero_latency_is_recorded_as_one_microsecond() -> AppResult<()> {
    let mut histogram = LatencyHistogram::new()?;
    histogram.record(Duration::ZERO)?;
    let summary = histogram.summary();
    if summary.samples != 1 || summary.min_us != 1 {
        return Err(AppError::validation(format!(
            "Unexpected summary: {:?}",
            summary
        )));
    }
    Ok(())
}

#[test]
fn long_latencies_keep_their_magnitude() -> AppResult<()> {
    let mut histogram = LatencyHistogram::new()?;
    histogram.record(Duration::from_millis(250))?;
    histogram.record(Duration::from_secs(30))?;
    let summary = histogram.summary();
    // Three significant figures: within 0.1% of the recorded value.
    if !(249_750..=250_250).contains(&summary.min_us)
        || !(29_970_000..=30_030_000).contains(&summary.max_us)
    {
        return Err(AppError::validation(format!(
            "Latencies were clamped: {:?}",
            summary
        )));
    }
    Ok(())
}

#[test]
fn tally_reports_real_latencies() -> AppResult<()> {
    let tally = ResultTally::new()?;
    for _ in 0..10 {
        tally.record(RequestOutcome::Success, Duration::from_millis(40))?;
    }
    let latency = tally.snapshot().latency;
    if latency.samples != 10 || latency.p50_us < 39_000 || latency.p99_us > 41_000 {
        return Err(AppError::validation(format!(
            "Unexpected latency summary: {:?}",
            latency
        )));
    }
    Ok(())
}
