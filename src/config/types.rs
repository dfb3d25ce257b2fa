use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::args::OutputFormat;
use crate::args::parsers::parse_duration;
use crate::error::ValidationError;

/// On-disk mirror of the CLI flags. Every field is optional; CLI values win.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub requests: Option<u64>,
    pub concurrency: Option<usize>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub deadline: Option<DurationValue>,
    pub output_format: Option<OutputFormat>,
    pub template: Option<PathBuf>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

/// Either a whole number of seconds or a string with a unit (`500ms`, `2m`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration(text),
        }
    }
}
