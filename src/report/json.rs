use std::io::Write;

use crate::error::RenderError;

use super::{Report, ReportRenderer};

/// Pretty-printed JSON document of the whole report.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(&self, report: Report, out: &mut dyn Write) -> Result<(), RenderError> {
        serde_json::to_writer_pretty(&mut *out, &report)
            .map_err(|err| RenderError::Serialize { source: err })?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}
