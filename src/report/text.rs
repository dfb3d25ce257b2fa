use std::io::Write;

use crate::error::RenderError;

use super::{Report, ReportRenderer};

/// Divisor for values stored in hundredths.
const PERCENT_DIVISOR: u64 = 100;
/// Microseconds per millisecond.
const US_PER_MS: u64 = 1_000;

/// Plain line-oriented summary, the default output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn render(&self, report: Report, out: &mut dyn Write) -> Result<(), RenderError> {
        for line in summary_lines(&report) {
            writeln!(out, "{}", line)?;
        }
        out.flush()?;
        Ok(())
    }
}

pub(super) fn summary_lines(report: &Report) -> Vec<String> {
    let success_rate = report.success_rate_x100();
    let rps = report.avg_rps_x100();
    let latency = &report.latency;

    let mut lines = vec![
        format!("Target: {}", report.url),
        format!("Started: {}", report.started_at.to_rfc3339()),
        format!("Total Time: {}ms", report.elapsed_ms()),
        format!(
            "Total Requests: {} of {} planned (concurrency {})",
            report.total_requests, report.planned_requests, report.concurrency
        ),
        format!(
            "Successful (200): {} ({}.{:02}%)",
            report.total_ok,
            success_rate / PERCENT_DIVISOR,
            success_rate % PERCENT_DIVISOR
        ),
    ];

    if report.status_counts.is_empty() {
        lines.push("Other Status Codes: none".to_owned());
    } else {
        lines.push(format!("Other Status Codes: {}", report.non_ok_responses()));
        for (status, count) in &report.status_counts {
            lines.push(format!("  {}: {}", status, count));
        }
    }

    lines.push(format!(
        "Transport Errors: {} (timeouts: {})",
        report.transport_errors, report.timeouts
    ));
    lines.push(format!(
        "Latency min/mean/max: {} / {} / {}",
        format_micros(latency.min_us),
        format_micros(latency.mean_us),
        format_micros(latency.max_us)
    ));
    lines.push(format!(
        "Latency p50/p90/p99: {} / {} / {}",
        format_micros(latency.p50_us),
        format_micros(latency.p90_us),
        format_micros(latency.p99_us)
    ));
    lines.push(format!(
        "Avg RPS: {}.{:02}",
        rps / PERCENT_DIVISOR,
        rps % PERCENT_DIVISOR
    ));
    if report.interrupted {
        lines.push("Run stopped early; unclaimed requests were not sent.".to_owned());
    }
    lines
}

/// Formats microseconds as milliseconds with three decimals.
pub(super) fn format_micros(micros: u64) -> String {
    format!("{}.{:03}ms", micros / US_PER_MS, micros % US_PER_MS)
}
