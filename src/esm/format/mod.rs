//! File format parsing layer for plugin files.
//!
//! This module bridges raw file bytes and the record loaders.
//!
//! # Module Organization
//!
//! - [`reader`]: Walks top-level records and nested groups
//! - [`record`]: Walks the sub-chunks of a single record
//! - [`header`]: Parses the `TES4` file header and its master list
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  TES4 record    │ ← header::parse()
//! ├─────────────────┤
//! │  GRUP           │ ← EsmReader::next_record()
//! │  ├─ record      │     descends into groups,
//! │  ├─ GRUP        │     yields records
//! │  │  └─ record   │
//! │  └─ record      │ ← RecordReader::next_sub_chunk()
//! ├─────────────────┤
//! │  ...            │
//! └─────────────────┘
//! ```

pub mod header;
pub mod reader;
pub mod record;

pub use reader::{EsmReader, RawRecord};
pub use record::{ReadValue, RecordReader};
