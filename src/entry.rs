use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::warn;

use crate::app;
use crate::args::TesterArgs;
use crate::config::{DEFAULT_CONFIG_FILES, LoadPlan};
use crate::error::{AppError, AppResult, ValidationError};

/// Parse the command line, then drive one load test to completion.
///
/// # Errors
///
/// Returns an error when arguments or the config file are invalid, the HTTP
/// client cannot be built, or the runtime fails to start.
pub fn run() -> AppResult<()> {
    let (args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    crate::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
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

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(mut args: TesterArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, matches, &config)?;
    }

    if args.url.as_deref().is_none_or(|url| url.trim().is_empty()) {
        tracing::error!("Missing URL (set --url or provide it in a config file).");
        return Err(AppError::validation(ValidationError::MissingUrl));
    }

    let plan = LoadPlan::from_args(&args)?;
    app::print_banner(&plan);

    let show_progress = !args.no_progress && std::io::stderr().is_terminal();
    let report = app::run_load(plan, show_progress).await?;

    if let Some(err) = report.cancelled.as_ref() {
        warn!("{}; reporting partial results", err);
    }
    app::print_summary(&report.summary);
    Ok(())
}
