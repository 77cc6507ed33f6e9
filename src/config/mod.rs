//! Configuration management for Potash.
//!
//! Provides XDG-compliant settings storage. The candidate port list lives
//! here rather than in the delivery code so it can be swapped per install.

mod settings;

pub use settings::{Paths, Settings};
