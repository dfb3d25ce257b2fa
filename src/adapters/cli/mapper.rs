use reqwest::Url;

use crate::args::{OutputFormat, TesterArgs};
use crate::domain::RunConfig;
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::ClientSettings;
use crate::report::{ReportRenderer, renderer_for};

/// URL schemes the executor can drive.
const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];

impl TryFrom<&TesterArgs> for RunConfig {
    type Error = AppError;

    fn try_from(args: &TesterArgs) -> AppResult<Self> {
        let (url, total_requests, concurrency) =
            match (args.url.as_deref(), args.requests, args.concurrency) {
                (Some(url), Some(requests), Some(concurrency)) => (url, requests, concurrency),
                (url, requests, concurrency) => {
                    let missing = [
                        ("--url", url.is_none()),
                        ("--requests", requests.is_none()),
                        ("--concurrency", concurrency.is_none()),
                    ]
                    .into_iter()
                    .filter_map(|(flag, absent)| absent.then_some(flag))
                    .collect::<Vec<_>>()
                    .join(", ");
                    tracing::error!("Incomplete run flags, missing: {}", missing);
                    return Err(AppError::validation(ValidationError::IncompleteRunFlags {
                        missing,
                    }));
                }
            };

        Ok(RunConfig::new(parse_target_url(url)?, total_requests, concurrency)
            .with_deadline(args.deadline)
            .with_client(ClientSettings {
                request_timeout: args.request_timeout,
                connect_timeout: args.connect_timeout,
            }))
    }
}

fn parse_target_url(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|err| {
        AppError::validation(ValidationError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
        return Err(AppError::validation(ValidationError::UnsupportedScheme {
            scheme: url.scheme().to_owned(),
        }));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AppError::validation(ValidationError::UrlMissingHost));
    }
    Ok(url)
}

/// Chooses the report renderer for the merged arguments.
///
/// # Errors
///
/// Returns an error when a template is combined with JSON output.
pub fn select_renderer(args: &TesterArgs) -> AppResult<Box<dyn ReportRenderer>> {
    if args.template.is_some() && args.output_format == OutputFormat::Json {
        return Err(AppError::validation(
            ValidationError::TemplateWithJsonOutput,
        ));
    }
    Ok(renderer_for(args.output_format, args.template.as_deref()))
}
