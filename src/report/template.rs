use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::RenderError;

use super::text::format_micros;
use super::{Report, ReportRenderer};

const FIELD_OPEN: &str = "{{";
const FIELD_CLOSE: &str = "}}";

/// Fills a user-supplied text template with report values.
///
/// Placeholders look like `{{total_ok}}`; surrounding whitespace inside the
/// braces is ignored. The file is read when the report is rendered, so a
/// missing template only surfaces after the run has finished.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    path: PathBuf,
}

impl TemplateRenderer {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn load(&self) -> Result<String, RenderError> {
        let template =
            fs::read_to_string(&self.path).map_err(|err| RenderError::ReadTemplate {
                path: self.path.clone(),
                source: err,
            })?;
        if template.trim().is_empty() {
            return Err(RenderError::EmptyTemplate {
                path: self.path.clone(),
            });
        }
        Ok(template)
    }
}

impl ReportRenderer for TemplateRenderer {
    fn render(&self, report: Report, out: &mut dyn Write) -> Result<(), RenderError> {
        let template = self.load()?;
        let rendered = fill_template(&template, &report)?;
        out.write_all(rendered.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

pub(super) fn fill_template(template: &str, report: &Report) -> Result<String, RenderError> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    let mut consumed = 0usize;

    while let Some(open) = rest.find(FIELD_OPEN) {
        let (literal, tail) = rest.split_at(open);
        rendered.push_str(literal);
        let body = tail.get(FIELD_OPEN.len()..).unwrap_or_default();
        let Some(close) = body.find(FIELD_CLOSE) else {
            return Err(RenderError::UnclosedField {
                offset: consumed.saturating_add(open),
            });
        };
        let (name, after) = body.split_at(close);
        rendered.push_str(&field_value(name.trim(), report)?);

        let next = after.get(FIELD_CLOSE.len()..).unwrap_or_default();
        consumed = consumed.saturating_add(rest.len().saturating_sub(next.len()));
        rest = next;
    }
    rendered.push_str(rest);
    Ok(rendered)
}

fn field_value(name: &str, report: &Report) -> Result<String, RenderError> {
    let value = match name {
        "url" => report.url.clone(),
        "total_time" => format!("{}ms", report.elapsed_ms()),
        "total_requests" => report.total_requests.to_string(),
        "total_ok" => report.total_ok.to_string(),
        "transport_errors" => report.transport_errors.to_string(),
        "timeouts" => report.timeouts.to_string(),
        "status_counts" => format_status_counts(report),
        "planned_requests" => report.planned_requests.to_string(),
        "concurrency" => report.concurrency.to_string(),
        "p50" => format_micros(report.latency.p50_us),
        "p90" => format_micros(report.latency.p90_us),
        "p99" => format_micros(report.latency.p99_us),
        _ => {
            return Err(RenderError::UnknownField {
                field: name.to_owned(),
            });
        }
    };
    Ok(value)
}

fn format_status_counts(report: &Report) -> String {
    if report.status_counts.is_empty() {
        return "none".to_owned();
    }
    report
        .status_counts
        .iter()
        .map(|(status, count)| format!("{}: {}", status, count))
        .collect::<Vec<_>>()
        .join(", ")
}
