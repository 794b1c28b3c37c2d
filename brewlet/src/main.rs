// brewlet/src/main.rs
use std::process;

use brewlet_common::error::{BrewletError, Result as BrewletResult};
use brewlet_common::model::Formula;
use clap::Parser;
use colored::Colorize;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod cli;
mod ui;

use cli::{CliArgs, Context};

fn init_logging(verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("BREWLET_LOG")
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();
}

fn load_formula(cli_args: &CliArgs) -> BrewletResult<Formula> {
    match &cli_args.formula {
        Some(path) => Formula::load_from_path(path),
        None => Formula::builtin(),
    }
}

async fn run(cli_args: &CliArgs) -> BrewletResult<()> {
    let config = cli_args.config()?;
    let formula = load_formula(cli_args)?;
    let ctx = Context {
        config: &config,
        formula: &formula,
        platform: cli_args.platform,
        verbose: cli_args.verbose,
    };
    cli_args.command.run(&ctx).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> BrewletResult<()> {
    let cli_args = CliArgs::parse();
    init_logging(cli_args.verbose);

    if let Err(e) = run(&cli_args).await {
        error!("Command failed: {:#}", e);
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        if e.is_retryable() {
            eprintln!("This looks transient; re-running the install is safe.");
        } else if matches!(e, BrewletError::UnsupportedPlatform { .. }) {
            eprintln!("No release artifact exists for this machine.");
        }
        process::exit(1);
    }

    debug!("Command completed successfully.");
    Ok(())
}
