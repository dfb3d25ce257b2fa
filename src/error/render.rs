use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write report: {source}")]
    Write {
        #[from]
        source: std::io::Error,
    },
    #[error("Failed to serialize report: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to read template '{path}': {source}")]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Template '{path}' is empty.")]
    EmptyTemplate { path: PathBuf },
    #[error("Unknown template field '{{{{{field}}}}}'.")]
    UnknownField { field: String },
    #[error("Unclosed template field starting at byte {offset}.")]
    UnclosedField { offset: usize },
}
