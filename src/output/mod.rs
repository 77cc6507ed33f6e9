//! Output formatting module.
//!
//! Provides formatters for plain text and JSON output of delivery results.

mod json_format;
mod plain;

pub use json_format::print_json;
pub use plain::{
    print_error, print_info, print_report, print_status, print_success, print_warning,
};

use crate::cli::OutputFormat;
use crate::delivery::{DeliveryReport, PortStatus};
use serde::Serialize;
use std::io;

/// JSON shape of a delivery report; includes the status line.
#[derive(Serialize)]
struct ReportView<'a> {
    message: String,
    #[serde(flatten)]
    report: &'a DeliveryReport,
}

/// Format and print a delivery report according to the specified format.
pub fn format_report(
    report: &DeliveryReport,
    format: OutputFormat,
    detailed: bool,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_report(report, detailed),
        OutputFormat::Json => print_json(&ReportView {
            message: report.message(),
            report,
        }),
    }
}

/// Format and print port reachability according to the specified format.
pub fn format_status(statuses: &[PortStatus], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_status(statuses),
        OutputFormat::Json => print_json(statuses),
    }
}
