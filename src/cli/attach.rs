//! Attach subcommand implementation.

use super::{sweep_spinner, OutputFormat};
use crate::delivery::Dispatcher;
use crate::error::CliResult;
use crate::output;
use crate::types::{Payload, Port, Target};
use clap::Parser;

/// Probe for a reachable instance.
///
/// Without `--port`, ports are probed in order and the first reachable one
/// is reported.
#[derive(Parser, Debug)]
pub struct AttachCommand {
    /// Probe only this port
    #[arg(short, long)]
    pub port: Option<Port>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,
}

impl AttachCommand {
    pub async fn execute(
        &self,
        dispatcher: &Dispatcher,
        verbose: bool,
        quiet: bool,
    ) -> CliResult<bool> {
        let target = self.port.map_or(Target::All, Target::Single);

        let spinner = sweep_spinner(
            "Looking for a reachable instance...".to_string(),
            target.is_all() && !quiet && self.output == OutputFormat::Plain,
        );
        let report = dispatcher.deliver(&Payload::Probe, target).await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        output::format_report(&report, self.output, verbose)?;
        Ok(report.is_success())
    }
}
