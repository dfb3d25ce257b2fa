use super::select_renderer;
use crate::args::{OutputFormat, TesterArgs};
use crate::domain::RunConfig;
use crate::error::{AppError, AppResult, ValidationError};
use clap::Parser;
use std::time::Duration;

fn parse(argv: &[&str]) -> AppResult<TesterArgs> {
    TesterArgs::try_parse_from(argv).map_err(AppError::from)
}

#[test]
fn complete_flags_map_to_run_config() -> AppResult<()> {
    let args = parse(&[
        "barrage",
        "-u",
        "https://example.com/api",
        "-r",
        "250",
        "-c",
        "25",
        "--timeout",
        "2s",
        "--deadline",
        "30s",
    ])?;
    let config = RunConfig::try_from(&args)?;
    if config.url.as_str() != "https://example.com/api" {
        return Err(AppError::validation("Unexpected url"));
    }
    if config.total_requests != 250 || config.concurrency.get() != 25 {
        return Err(AppError::validation("Unexpected counts"));
    }
    if config.deadline != Some(Duration::from_secs(30))
        || config.client.request_timeout != Some(Duration::from_secs(2))
        || config.client.connect_timeout.is_some()
    {
        return Err(AppError::validation("Unexpected optional settings"));
    }
    Ok(())
}

#[test]
fn partial_flags_name_what_is_missing() -> AppResult<()> {
    let args = parse(&["barrage", "-u", "http://localhost"])?;
    match RunConfig::try_from(&args) {
        Err(AppError::Validation(ValidationError::IncompleteRunFlags { missing }))
            if missing == "--requests, --concurrency" =>
        {
            Ok(())
        }
        other => Err(AppError::validation(format!(
            "Expected IncompleteRunFlags, got {:?}",
            other
        ))),
    }
}

#[test]
fn zero_requests_are_a_valid_run() -> AppResult<()> {
    let args = parse(&["barrage", "-u", "http://localhost:1/", "-r", "0", "-c", "3"])?;
    let config = RunConfig::try_from(&args)?;
    if config.total_requests != 0 || config.worker_count() != 0 {
        return Err(AppError::validation("Expected an empty run"));
    }
    Ok(())
}

#[test]
fn bad_urls_are_rejected() -> AppResult<()> {
    let cases = ["not a url", "ftp://example.com/file", "file:///etc/hosts"];
    for raw in cases {
        let args = parse(&["barrage", "-u", raw, "-r", "1", "-c", "1"])?;
        match RunConfig::try_from(&args) {
            Err(AppError::Validation(
                ValidationError::InvalidUrl { .. }
                | ValidationError::UnsupportedScheme { .. }
                | ValidationError::UrlMissingHost,
            )) => {}
            other => {
                return Err(AppError::validation(format!(
                    "Expected URL rejection for '{}', got {:?}",
                    raw, other
                )));
            }
        }
    }
    Ok(())
}

#[test]
fn template_conflicts_with_json_output() -> AppResult<()> {
    let args = parse(&["barrage", "--output-format", "json", "--template", "t.txt"])?;
    match select_renderer(&args) {
        Err(AppError::Validation(ValidationError::TemplateWithJsonOutput)) => {}
        Err(err) => {
            return Err(AppError::validation(format!(
                "Expected TemplateWithJsonOutput, got {}",
                err
            )));
        }
        Ok(_) => return Err(AppError::validation("Expected a conflict")),
    }

    let text = parse(&["barrage", "--template", "t.txt"])?;
    if text.output_format != OutputFormat::Text || select_renderer(&text).is_err() {
        return Err(AppError::validation("Template with text output should be accepted"));
    }
    Ok(())
}
