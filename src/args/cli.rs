use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use super::parsers::{parse_bool_env, parse_duration_arg, parse_positive_usize};
use super::types::{OutputFormat, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Bounded-concurrency HTTP GET load tester - fires a fixed number of requests with a fixed number of workers and prints one summary report."
)]
pub struct TesterArgs {
    /// Target URL for the load test
    #[arg(long, short)]
    pub url: Option<String>,

    /// Total number of GET requests to send
    #[arg(long, short = 'r')]
    pub requests: Option<u64>,

    /// Number of requests kept in flight at once
    #[arg(long, short = 'c', value_parser = parse_positive_usize)]
    pub concurrency: Option<PositiveUsize>,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", value_parser = parse_duration_arg)]
    pub request_timeout: Option<Duration>,

    /// TCP/TLS connect timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", value_parser = parse_duration_arg)]
    pub connect_timeout: Option<Duration>,

    /// Stop starting new requests after this long (supports ms/s/m/h)
    #[arg(long = "deadline", value_parser = parse_duration_arg)]
    pub deadline: Option<Duration>,

    /// Path to config file (TOML or JSON)
    #[arg(long = "config")]
    pub config: Option<String>,

    /// Report format written to stdout
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Render the report through a text template with {{field}} placeholders
    #[arg(long = "template")]
    pub template: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
