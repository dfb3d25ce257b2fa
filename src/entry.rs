use std::ffi::OsString;
use std::sync::Arc;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::warn;

use crate::adapters::cli::select_renderer;
use crate::args::TesterArgs;
use crate::config::{apply_config, default_config_exists, load_config};
use crate::domain::RunConfig;
use crate::engine::{RunController, run_and_render};
use crate::error::{AppError, AppResult, EngineError};
use crate::http::{HttpExecutor, build_client};
use crate::report::ReportRenderer;
use crate::shutdown::shutdown_channel;
use crate::shutdown_handlers::setup_signal_shutdown_handler;

/// Process entry point: parse, merge config, run once, print the report.
///
/// # Errors
///
/// Returns an error when arguments or config are invalid, the HTTP client
/// cannot be built, the run cannot be accounted for, or the report cannot
/// be written.
pub fn run() -> AppResult<()> {
    let (mut args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    merge_config(&mut args, &matches)?;
    crate::logger::init_logging(args.verbose, args.no_color);

    let run_config = RunConfig::try_from(&args)?;
    let renderer = select_renderer(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(&run_config, renderer.as_ref()))
}

fn parse_args() -> AppResult<Option<(TesterArgs, ArgMatches)>> {
    let mut cmd = TesterArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = TesterArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !default_config_exists()
}

fn merge_config(args: &mut TesterArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(args, matches, &config)?;
    }
    Ok(())
}

async fn run_async(config: &RunConfig, renderer: &dyn ReportRenderer) -> AppResult<()> {
    let client = build_client(config.client)?;
    let controller = RunController::new(Arc::new(HttpExecutor::new(client)));

    let (shutdown_tx, _) = shutdown_channel();
    let mut signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let mut stdout = std::io::stdout();
    let result = tokio::select! {
        result = run_and_render(&controller, config, &shutdown_tx, renderer, &mut stdout) => result,
        Ok(signal) = &mut signal_handle => {
            warn!("Received {} again; abandoning in-flight requests.", signal);
            Err(AppError::engine(EngineError::Aborted { signal }))
        }
    };
    signal_handle.abort();

    result
}
