//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::delivery::{DeliveryReport, PortStatus};
use console::style;
use std::io::{self, Write};

/// Print a delivery report in human-readable form.
///
/// The status line always comes first; per-port detail follows when
/// `detailed` is set.
pub fn print_report(report: &DeliveryReport, detailed: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let message = report.message();
    if report.is_success() {
        writeln!(out, "{} {}", style("✓").green().bold(), message)?;
    } else {
        writeln!(out, "{} {}", style("✗").red().bold(), message)?;
    }

    if detailed {
        for attempt in &report.attempts {
            let outcome = if attempt.outcome.is_success() {
                style(attempt.outcome.to_string()).green()
            } else {
                style(attempt.outcome.to_string()).red()
            };
            write!(out, "  {} {}", style(format!("{:<7}", attempt.port)).bold(), outcome)?;
            match attempt.outcome.error() {
                Some(err) => writeln!(out, " {}", style(err).dim())?,
                None => writeln!(out)?,
            }
        }
    }

    Ok(())
}

/// Print a reachability table.
pub fn print_status(statuses: &[PortStatus]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(
        out,
        "{} {}",
        style(format!("{:<8}", "PORT")).bold(),
        style("STATE").bold()
    )?;
    for status in statuses {
        let (dot, state) = if status.reachable {
            (style("●").green(), style("reachable").green())
        } else {
            (style("●").dim(), style("unreachable").dim())
        };
        writeln!(out, "{:<8} {} {}", status.port.to_string(), dot, state)?;
    }

    let alive = statuses.iter().filter(|s| s.reachable).count();
    writeln!(out)?;
    writeln!(
        out,
        "  {} of {} ports reachable",
        style(alive).green().bold(),
        statuses.len()
    )?;

    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}
