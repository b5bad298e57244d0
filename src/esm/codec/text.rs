//! String decoding for sub-chunk text.

use encoding_rs::Encoding;

/// Decodes `bytes` up to the first NUL, replacing malformed sequences.
pub fn decode_until_nul(bytes: &[u8], encoding: &'static Encoding) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let (text, _) = encoding.decode_without_bom_handling(&bytes[..end]);
    text.into_owned()
}
