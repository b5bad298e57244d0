//! Decompression of record payloads flagged as compressed.
//!
//! A compressed payload is a little-endian `u32` holding the inflated size,
//! followed by a zlib stream.

use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};
use flate2::read::ZlibDecoder;
use log::trace;

use crate::esm::types::error::{LoadError, Result};

/// Inflates a compressed record payload.
///
/// # Validation
/// Verifies that the inflated size exactly matches the size prefix.
///
/// # Errors
/// Returns an error if the prefix is missing, the stream is corrupt, or the
/// inflated length differs from the prefix.
pub fn inflate_record(payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() < 4 {
        return Err(LoadError::SizeMismatch {
            context: "compressed record size prefix",
            expected: 4,
            found: payload.len() as u64,
        });
    }
    let expected_size = LittleEndian::read_u32(&payload[..4]) as u64;
    trace!(
        "Decompressing with Zlib: {} bytes -> {} bytes (expected)",
        payload.len() - 4,
        expected_size
    );

    let mut output = Vec::with_capacity(expected_size as usize);
    // One extra byte so an oversized stream shows up as a mismatch
    let mut decoder = ZlibDecoder::new(&payload[4..]).take(expected_size + 1);
    decoder
        .read_to_end(&mut output)
        .map_err(|e| LoadError::Decompression(format!("Zlib decompression failed: {}", e)))?;

    if output.len() as u64 != expected_size {
        return Err(LoadError::SizeMismatch {
            context: "inflated record payload",
            expected: expected_size,
            found: output.len() as u64,
        });
    }
    Ok(output)
}
