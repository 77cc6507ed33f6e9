//! Check subcommand implementation.

use super::OutputFormat;
use crate::delivery::{Dispatcher, PortStatus};
use crate::error::CliResult;
use crate::output;
use crate::types::Port;
use clap::Parser;

/// Check whether a port accepts connections.
///
/// Exits non-zero when the port is unreachable.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Port to check
    #[arg(value_name = "PORT")]
    pub port: Port,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,
}

impl CheckCommand {
    pub async fn execute(&self, dispatcher: &Dispatcher, quiet: bool) -> CliResult<bool> {
        let reachable = dispatcher.check_port(self.port).await;

        match self.output {
            OutputFormat::Json => output::print_json(&PortStatus {
                port: self.port,
                reachable,
            })?,
            OutputFormat::Plain if quiet => {}
            OutputFormat::Plain if reachable => {
                output::print_success(&format!("Port {} is reachable", self.port))
            }
            OutputFormat::Plain => {
                output::print_error(&format!("Port {} is not reachable", self.port))
            }
        }

        Ok(reachable)
    }
}
