//! Error types for Potash.
//!
//! Uses `thiserror` for ergonomic error definitions.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Error raised by a single delivery attempt against one port.
///
/// These never escape the dispatcher's public operations; they are folded
/// into per-port outcomes and the final status string.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("connect to {addr} timed out after {timeout_ms}ms")]
    Timeout { addr: SocketAddr, timeout_ms: u64 },

    #[error("connect to {addr} failed: {reason}")]
    Connection { addr: SocketAddr, reason: String },

    #[error("write to {addr} failed: {reason}")]
    Write { addr: SocketAddr, reason: String },

    #[error("payload compression failed: {0}")]
    Compression(String),
}

/// Result type alias for delivery operations.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors surfaced by CLI command handlers.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
