//! Payload compression.
//!
//! Scripts go over the wire as UTF-8 text in a zlib-wrapped DEFLATE stream
//! at the default level.

use crate::error::{DeliveryError, DeliveryResult};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// Compress script text for the wire.
pub fn compress(text: &str) -> DeliveryResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(text.as_bytes())
        .map_err(|e| DeliveryError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| DeliveryError::Compression(e.to_string()))
}
