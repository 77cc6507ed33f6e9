//! Payload to deliver, or a reachability probe.

use serde::{Deserialize, Serialize};

/// What a delivery sends once connected.
///
/// `Probe` sends nothing: a bare connect/close cycle is the signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    Probe,
    Data(String),
}

impl Payload {
    /// Reserved script text that hosts send to mean "probe only".
    pub const PROBE_MARKER: &'static str = "NULL";

    /// Wrap script text as real data, even if it equals the probe marker.
    pub fn data(text: impl Into<String>) -> Self {
        Self::Data(text.into())
    }

    /// Interpret raw script text the way existing hosts send it, where the
    /// literal `NULL` selects probe mode.
    pub fn from_raw(text: impl Into<String>) -> Self {
        let text = text.into();
        if text == Self::PROBE_MARKER {
            Self::Probe
        } else {
            Self::Data(text)
        }
    }

    pub fn is_probe(&self) -> bool {
        matches!(self, Self::Probe)
    }

    /// Script text, or `None` for a probe.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Probe => None,
            Self::Data(text) => Some(text),
        }
    }
}
