//! Delivery target selection.
//!
//! A target is either one explicit port or every port in the configured
//! [`PortSet`](super::PortSet). The string form uses `ALL` for the latter.

use super::port::{Port, PortError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which ports a delivery should try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Every port in the configured set, fanned out.
    All,
    /// A single explicit port.
    Single(Port),
}

impl Target {
    /// Reserved selector meaning "every known port".
    pub const ALL: &'static str = "ALL";

    pub fn is_all(self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<Port> for Target {
    fn from(port: Port) -> Self {
        Self::Single(port)
    }
}

impl FromStr for Target {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == Self::ALL {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Single)
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{}", Self::ALL),
            Self::Single(port) => write!(f, "{}", port),
        }
    }
}
