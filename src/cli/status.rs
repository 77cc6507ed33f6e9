//! Status subcommand implementation.

use super::{sweep_spinner, OutputFormat};
use crate::delivery::Dispatcher;
use crate::error::CliResult;
use crate::output;
use clap::Parser;

/// Show reachability of every configured port.
#[derive(Parser, Debug)]
pub struct StatusCommand {
    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,
}

impl StatusCommand {
    pub async fn execute(&self, dispatcher: &Dispatcher, quiet: bool) -> CliResult<bool> {
        let spinner = sweep_spinner(
            format!("Checking {} ports...", dispatcher.ports().len()),
            !quiet && self.output == OutputFormat::Plain,
        );
        let statuses = dispatcher.port_status().await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        output::format_status(&statuses, self.output)?;
        Ok(true)
    }
}
