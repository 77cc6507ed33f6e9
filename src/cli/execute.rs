//! Execute subcommand implementation.
//!
//! Handles `potash execute <script>`, delivering a script to one port or
//! fanning it out to every configured port.

use super::{sweep_spinner, OutputFormat};
use crate::delivery::Dispatcher;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::types::{Payload, Target};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

/// Deliver a script.
#[derive(Parser, Debug)]
pub struct ExecuteCommand {
    /// Script text to deliver
    #[arg(value_name = "SCRIPT", required_unless_present = "file", conflicts_with = "file")]
    pub script: Option<String>,

    /// Read the script from a file (e.g. a .lua or .txt script)
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Port to deliver to, or ALL for every configured port
    #[arg(short, long, default_value = "ALL")]
    pub port: Target,

    /// Treat a script of exactly NULL as a probe, as existing hosts do
    #[arg(long)]
    pub raw: bool,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,
}

impl ExecuteCommand {
    /// Run the delivery. Returns whether any port accepted it.
    pub async fn execute(
        &self,
        dispatcher: &Dispatcher,
        verbose: bool,
        quiet: bool,
    ) -> CliResult<bool> {
        let payload = self.payload()?;

        if !self.raw && payload.text() == Some(Payload::PROBE_MARKER) && !quiet {
            output::print_warning(
                "script is the literal NULL; sending it as data (use --raw to probe)",
            );
        }

        let spinner = sweep_spinner(
            format!("Delivering to {} ports...", dispatcher.ports().len()),
            self.port.is_all() && !quiet && self.output == OutputFormat::Plain,
        );
        let report = dispatcher.deliver(&payload, self.port).await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        output::format_report(&report, self.output, verbose)?;
        Ok(report.is_success())
    }

    fn payload(&self) -> CliResult<Payload> {
        let text = match (&self.script, &self.file) {
            (Some(script), _) => script.clone(),
            (None, Some(path)) => fs::read_to_string(path).map_err(|e| {
                CliError::Other(format!("failed to read script {}: {}", path.display(), e))
            })?,
            (None, None) => return Err(CliError::Other("no script given".to_string())),
        };

        Ok(if self.raw {
            Payload::from_raw(text)
        } else {
            Payload::data(text)
        })
    }
}
