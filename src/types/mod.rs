//! Core type definitions using newtype patterns for type safety.
//!
//! Sentinel strings (`ALL`, `NULL`) are parsed into tagged variants at the
//! boundary so the delivery core never compares strings.

mod payload;
mod port;
mod target;

pub use payload::Payload;
pub use port::{Port, PortError, PortSet};
pub use target::Target;
