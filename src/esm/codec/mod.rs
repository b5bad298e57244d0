//! Codec layer for record payloads.
//!
//! # Submodules
//!
//! - [`compression`][]: Inflating zlib-compressed record payloads
//! - [`text`][]: Decoding stored strings with the configured code page

pub mod compression;
pub mod text;
