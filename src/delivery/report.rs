//! Per-port outcomes and the aggregate delivery report.

use crate::error::DeliveryError;
use crate::types::Port;
use serde::Serialize;
use std::fmt;

/// Status string when nothing was delivered.
pub const FAILED_ALL: &str = "Failed to connect on all ports";

/// Outcome of one port's attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Connected, and the payload (if any) was written.
    Connected,
    TimedOut(String),
    ConnectionError(String),
    /// The payload could not be prepared or written after connecting.
    WriteError(String),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Error message for failed attempts.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Connected => None,
            Self::TimedOut(msg) | Self::ConnectionError(msg) | Self::WriteError(msg) => Some(msg),
        }
    }
}

impl From<Result<(), DeliveryError>> for AttemptOutcome {
    fn from(result: Result<(), DeliveryError>) -> Self {
        match result {
            Ok(()) => Self::Connected,
            Err(e @ DeliveryError::Timeout { .. }) => Self::TimedOut(e.to_string()),
            Err(e @ DeliveryError::Connection { .. }) => Self::ConnectionError(e.to_string()),
            Err(e @ (DeliveryError::Write { .. } | DeliveryError::Compression(_))) => {
                Self::WriteError(e.to_string())
            }
        }
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "connected"),
            Self::TimedOut(_) => write!(f, "timed out"),
            Self::ConnectionError(_) => write!(f, "connection error"),
            Self::WriteError(_) => write!(f, "write error"),
        }
    }
}

/// A port and what happened when it was tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortAttempt {
    pub port: Port,
    pub outcome: AttemptOutcome,
}

/// How the dispatcher walked the working port list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Every port attempted; outcome aggregated by success count.
    FanOut,
    /// Stop at the first success; failures are discarded.
    ShortCircuit,
}

/// Everything one `deliver` call observed.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    pub mode: DeliveryMode,
    /// Attempts in the order they were made.
    pub attempts: Vec<PortAttempt>,
    /// Most recent failure message. Only kept in fan-out mode.
    pub last_error: Option<String>,
}

impl DeliveryReport {
    pub(crate) fn new(mode: DeliveryMode) -> Self {
        Self {
            mode,
            attempts: Vec::new(),
            last_error: None,
        }
    }

    pub(crate) fn record(&mut self, port: Port, outcome: AttemptOutcome) {
        if self.mode == DeliveryMode::FanOut {
            if let Some(msg) = outcome.error() {
                self.last_error = Some(msg.to_string());
            }
        }
        self.attempts.push(PortAttempt { port, outcome });
    }

    /// Ports that accepted the delivery, in attempt order.
    pub fn succeeded(&self) -> Vec<Port> {
        self.attempts
            .iter()
            .filter(|a| a.outcome.is_success())
            .map(|a| a.port)
            .collect()
    }

    /// Every failure seen, in attempt order.
    pub fn errors(&self) -> Vec<(Port, &str)> {
        self.attempts
            .iter()
            .filter_map(|a| a.outcome.error().map(|msg| (a.port, msg)))
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.attempts.iter().any(|a| a.outcome.is_success())
    }

    /// Human-readable status line.
    pub fn message(&self) -> String {
        let succeeded = self.succeeded();
        match (self.mode, succeeded.as_slice()) {
            (DeliveryMode::FanOut, []) => match &self.last_error {
                Some(err) => format!("{}: {}", FAILED_ALL, err),
                None => FAILED_ALL.to_string(),
            },
            (DeliveryMode::ShortCircuit, []) => FAILED_ALL.to_string(),
            (_, [port]) => connected_message(*port),
            (_, ports) => {
                let list: Vec<String> = ports.iter().map(|p| p.to_string()).collect();
                format!("Successfully executed on ports: {}", list.join(", "))
            }
        }
    }
}

pub(crate) fn connected_message(port: Port) -> String {
    format!("Successfully connected to Opiumware on port: {}", port)
}
