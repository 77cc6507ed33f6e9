//! # Potash - Multi-Port Loopback Script Delivery
//!
//! Potash delivers scripts to local service instances listening on a fixed
//! set of loopback TCP ports. Each script is compressed with zlib-wrapped
//! DEFLATE and written once per connection; closing the connection ends the
//! message.
//!
//! ## Features
//!
//! - **Fan-out delivery**: Send to every configured port and report which accepted it
//! - **Single-port delivery**: Send to one port, fail fast
//! - **Probes**: Connect and close without sending, to test reachability
//! - **Port checks**: Short-timeout reachability checks for status displays
//! - **Configurable port sets**: XDG settings file, CLI flags or environment
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use potash::delivery::Dispatcher;
//! use potash::types::{Payload, Target};
//!
//! #[tokio::main]
//! async fn main() {
//!     let dispatcher = Dispatcher::default();
//!
//!     let status = dispatcher
//!         .execute(&Payload::data("print('hello')"), Target::All)
//!         .await;
//!
//!     println!("{}", status);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Ports, port sets, targets and payloads
//! - [`delivery`] - Transport, compression and the dispatcher
//! - [`config`] - Settings persistence
//! - [`error`] - Error types
//! - [`output`] - Output formatting utilities

pub mod cli;
pub mod config;
pub mod delivery;
pub mod error;
pub mod output;
pub mod types;

// Re-export commonly used types
pub use config::Settings;
pub use delivery::{AttemptOutcome, DeliveryReport, Dispatcher, PortStatus};
pub use error::{CliError, ConfigError, DeliveryError};
pub use types::{Payload, Port, PortSet, Target};
