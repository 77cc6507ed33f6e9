//! Config subcommand implementation.
//!
//! Handles `potash config show|init`. Both act on the `--config` file when
//! one is given, otherwise on the XDG settings file.

use crate::config::{Paths, Settings};
use crate::error::{CliError, CliResult};
use crate::output;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Inspect or initialise settings.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective settings as JSON
    Show,

    /// Write default settings to the settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    /// `config` is the `--config` path, `settings` the effective settings.
    pub fn execute(
        &self,
        config: Option<&Path>,
        settings: &Settings,
        quiet: bool,
    ) -> CliResult<bool> {
        let file = settings_file(config)?;

        match self.action {
            ConfigAction::Show => {
                if !quiet {
                    output::print_info(&format!("Settings file: {}", file.display()));
                }
                output::print_json(settings)?;
            }
            ConfigAction::Init { force } => {
                if file.exists() && !force {
                    return Err(CliError::Other(format!(
                        "{} already exists (use --force to overwrite)",
                        file.display()
                    )));
                }

                Settings::default().save_to(&file)?;
                if !quiet {
                    output::print_success(&format!("Wrote {}", file.display()));
                }
            }
        }

        Ok(true)
    }
}

fn settings_file(config: Option<&Path>) -> CliResult<PathBuf> {
    match config {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Paths::new()?.settings_file()),
    }
}
