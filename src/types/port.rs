//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortSet` is the ordered candidate list every all-ports operation walks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
///
/// Using a newtype prevents accidental misuse of raw u16 values
/// and ensures port numbers are always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value: u16 = s
            .parse()
            .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
        Self::try_from(value)
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u16),
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// The ordered list of candidate ports.
///
/// Never empty. Order only fixes iteration (and therefore the order ports
/// appear in status messages); it carries no priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Port>", into = "Vec<Port>")]
pub struct PortSet {
    ports: Vec<Port>,
}

impl PortSet {
    /// First port of the default deployment range.
    pub const DEFAULT_FIRST: u16 = 8392;
    /// Last port of the default deployment range.
    pub const DEFAULT_LAST: u16 = 8397;

    /// Build a set from an ordered list, dropping repeats after their first
    /// occurrence.
    pub fn new(ports: impl IntoIterator<Item = Port>) -> Result<Self, PortError> {
        let mut unique: Vec<Port> = Vec::new();
        for port in ports {
            if !unique.contains(&port) {
                unique.push(port);
            }
        }

        if unique.is_empty() {
            return Err(PortError::Empty);
        }

        Ok(Self { ports: unique })
    }

    /// Iterate over ports in set order.
    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports.iter().copied()
    }

    /// Number of ports in the set.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl Default for PortSet {
    fn default() -> Self {
        Self {
            ports: (Self::DEFAULT_FIRST..=Self::DEFAULT_LAST)
                .map(Port)
                .collect(),
        }
    }
}

impl TryFrom<Vec<Port>> for PortSet {
    type Error = PortError;

    fn try_from(ports: Vec<Port>) -> Result<Self, Self::Error> {
        Self::new(ports)
    }
}

impl From<PortSet> for Vec<Port> {
    fn from(set: PortSet) -> Self {
        set.ports
    }
}

/// Parses specs like `"8392"`, `"8392,8394"`, `"8392-8397"` or a mix of them.
///
/// Unlike a sorted scan range, the written order is kept.
impl FromStr for PortSet {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }

        let mut ports = Vec::new();

        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start: Port = start.parse()?;
                let end: Port = end.parse()?;
                if start > end {
                    return Err(PortError::InvalidRange(start.0, end.0));
                }
                ports.extend((start.0..=end.0).map(Port));
            } else {
                ports.push(part.parse()?);
            }
        }

        Self::new(ports)
    }
}

impl fmt::Display for PortSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ports.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}
