//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `potash execute <script>` - Deliver a script to one port or all ports
//! - `potash attach` - Probe for a reachable instance
//! - `potash check <port>` - Test a single port
//! - `potash status` - Show reachability of every configured port
//! - `potash config show|init` - Inspect or write settings

mod attach;
mod check;
mod config;
mod execute;
mod status;

pub use attach::AttachCommand;
pub use check::CheckCommand;
pub use config::ConfigCommand;
pub use execute::ExecuteCommand;
pub use status::StatusCommand;

use crate::config::Settings;
use crate::error::CliResult;
use crate::types::PortSet;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Potash - deliver scripts to local service instances over TCP.
///
/// Scripts are DEFLATE-compressed and written to every reachable port in the
/// configured set, or to one chosen port.
#[derive(Parser, Debug)]
#[command(name = "potash")]
#[command(author = "HueCodes <huecodes@proton.me>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-port loopback script delivery", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to custom settings file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Candidate ports (e.g., "8392-8397", "8392,8394")
    #[arg(long, global = true, env = "POTASH_PORTS", value_name = "SPEC")]
    pub ports: Option<PortSet>,

    /// Connect timeout for deliveries in milliseconds
    #[arg(short = 't', long, global = true, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Connect timeout for port checks in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub probe_timeout: Option<u64>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deliver a script
    #[command(alias = "x")]
    Execute(ExecuteCommand),

    /// Probe for a reachable instance without sending anything
    #[command(alias = "a")]
    Attach(AttachCommand),

    /// Check whether a port accepts connections
    #[command(alias = "c")]
    Check(CheckCommand),

    /// Show reachability of every configured port
    #[command(alias = "s")]
    Status(StatusCommand),

    /// Inspect or initialise settings
    Config(ConfigCommand),
}

impl Cli {
    /// Load settings and apply command-line overrides.
    pub fn settings(&self) -> CliResult<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load_from(path)?,
            None => Settings::load()?,
        };

        if let Some(ports) = &self.ports {
            settings.ports = ports.clone();
        }
        if let Some(ms) = self.timeout {
            settings.connect_timeout_ms = ms;
        }
        if let Some(ms) = self.probe_timeout {
            settings.probe_timeout_ms = ms;
        }

        Ok(settings)
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Spinner for sequential port sweeps. Hidden automatically off a terminal.
fn sweep_spinner(msg: String, enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"ports": [9100], "connect_timeout_ms": 1000}"#).unwrap();

        let cli = Cli::parse_from([
            "potash",
            "--config",
            path.to_str().unwrap(),
            "--probe-timeout",
            "50",
            "status",
        ]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings.ports.to_string(), "9100");
        assert_eq!(settings.connect_timeout_ms, 1000);
        assert_eq!(settings.probe_timeout_ms, 50);

        let cli = Cli::parse_from([
            "potash",
            "--config",
            path.to_str().unwrap(),
            "--ports",
            "9200-9201",
            "-t",
            "300",
            "status",
        ]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings.ports.to_string(), "9200,9201");
        assert_eq!(settings.connect_timeout_ms, 300);
    }

    #[test]
    fn test_bad_port_spec_rejected() {
        assert!(Cli::try_parse_from(["potash", "--ports", "0-5", "status"]).is_err());
    }
}
