#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use clap::error::ErrorKind;
use engage::QueryExecutionError;
use engage::cli::app::{Cli, Command, RuntimeArgs};
use engage::cli::commands;
use engage::config::RuntimePaths;
use engage::models::QueryEnvelopeCommandFailure;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_QUERY_FAILURE: i32 = 2;
const EXIT_USAGE_ERROR: i32 = 64;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_parse_error(error),
    };
    let command_name = cli.command.name();
    log::info!("engage: starting `{command_name}`");

    match execute(cli) {
        Ok(()) => {
            log::info!("engage: completed `{command_name}` (exit_code={EXIT_SUCCESS})");
            EXIT_SUCCESS
        }
        Err(error) => {
            let exit_code = classify_runtime_error(&error);
            log::error!("engage: failed `{command_name}` (exit_code={exit_code})");
            match error.downcast_ref::<QueryEnvelopeCommandFailure>() {
                Some(failure) => println!("{failure}"),
                None => eprintln!("{error:#}"),
            }
            exit_code
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Score(args) => commands::score::run(&args),
        Command::Schema(args) => commands::schema::run(&args),
        Command::Report(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::report::run(&args, &runtime_paths)
        }
        Command::Init(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::init::run(&args, &runtime_paths)
        }
        Command::Seed(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::seed::run(&args, &runtime_paths)
        }
    }
}

fn classify_runtime_error(error: &anyhow::Error) -> i32 {
    if error
        .chain()
        .any(|cause| cause.is::<QueryExecutionError>())
    {
        EXIT_QUERY_FAILURE
    } else {
        EXIT_RUNTIME_FAILURE
    }
}

fn exit_code_for_parse_error(error: clap::Error) -> i32 {
    let _ = error.print();
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_SUCCESS,
        _ => EXIT_USAGE_ERROR,
    }
}

fn resolve_runtime_paths(args: &RuntimeArgs) -> Result<RuntimePaths> {
    let home_dir = match &args.home_dir {
        Some(path) => path.clone(),
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("HOME is not set; pass --home-dir"))?,
    };

    let cwd = match &args.cwd {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    engage::config::resolve_runtime_paths(&home_dir, &cwd, args.db.as_deref())
}
