//! Potash - deliver scripts to local service instances.
//!
//! Usage:
//!   potash execute <SCRIPT> [--port <PORT|ALL>]
//!   potash attach [--port <PORT>]
//!   potash check <PORT>
//!   potash status

use anyhow::Context;
use clap::Parser;
use potash::cli::{Cli, Commands};
use potash::delivery::Dispatcher;
use potash::output;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins; --verbose only changes the fallback.
    let fallback = if cli.verbose { "potash=debug" } else { "potash=error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<bool> {
    let settings = cli.settings().context("failed to load settings")?;
    let dispatcher = Dispatcher::from_settings(&settings);
    let (verbose, quiet) = (cli.verbose, cli.quiet);

    let ok = match &cli.command {
        Commands::Execute(cmd) => cmd.execute(&dispatcher, verbose, quiet).await?,
        Commands::Attach(cmd) => cmd.execute(&dispatcher, verbose, quiet).await?,
        Commands::Check(cmd) => cmd.execute(&dispatcher, quiet).await?,
        Commands::Status(cmd) => cmd.execute(&dispatcher, quiet).await?,
        Commands::Config(cmd) => cmd.execute(cli.config.as_deref(), &settings, quiet)?,
    };

    Ok(ok)
}
