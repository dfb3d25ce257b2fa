//! The run report and the renderers that turn it into output.
mod json;
mod model;
mod template;
mod text;


use std::io::Write;
use std::path::Path;

use crate::args::OutputFormat;
use crate::error::RenderError;

pub use json::JsonRenderer;
pub use model::Report;
pub use template::TemplateRenderer;
pub use text::TextRenderer;

/// Writes a finished [`Report`] to an output stream.
///
/// The renderer takes ownership of the report; the run is over once it is
/// handed off.
pub trait ReportRenderer {
    /// # Errors
    ///
    /// Returns an error when the report cannot be formatted or written.
    fn render(&self, report: Report, out: &mut dyn Write) -> Result<(), RenderError>;
}

/// Picks the renderer for the requested output. A template, when given,
/// takes precedence over the plain text layout.
#[must_use]
pub fn renderer_for(format: OutputFormat, template: Option<&Path>) -> Box<dyn ReportRenderer> {
    match (format, template) {
        (OutputFormat::Json, _) => Box::new(JsonRenderer),
        (OutputFormat::Text, Some(path)) => Box::new(TemplateRenderer::new(path)),
        (OutputFormat::Text, None) => Box::new(TextRenderer),
    }
}
