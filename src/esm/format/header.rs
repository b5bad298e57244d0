//! Parser for the `TES4` record that opens every plugin file.

use encoding_rs::Encoding;
use log::debug;

use super::reader::EsmReader;
use super::record::RecordReader;
use crate::esm::resolver::FileContext;
use crate::esm::types::error::{LoadError, Result};
use crate::esm::types::models::{FileHeader, MasterFile};
use crate::esm::types::tags::{self, Tag, rec};

/// Reads the file header, which must be the first record of the file.
///
/// # Errors
/// `InvalidMagic` if the file does not start with a `TES4` record, or any
/// framing error from its sub-chunks.
pub fn parse(reader: &mut EsmReader<'_>, name: &str, encoding: &'static Encoding) -> Result<FileHeader> {
    let found = reader.peek_tag().unwrap_or(Tag([0; 4]));
    if reader.position() != 0 || found != rec::TES4 {
        return Err(LoadError::InvalidMagic {
            expected: rec::TES4,
            found,
        });
    }
    let raw = reader.next_record()?.ok_or(LoadError::InvalidMagic {
        expected: rec::TES4,
        found,
    })?;
    let body = raw.body()?;

    // The header carries no identifiers, so a standalone context suffices.
    let context = FileContext::standalone(name, 0);
    let mut sub = RecordReader::new(raw.header, &body, &context, encoding);

    let mut header = FileHeader {
        name: name.to_string(),
        variant: reader.variant(),
        flags: raw.header.flags,
        version: 0.0,
        record_count: 0,
        next_object_id: 0,
        author: None,
        description: None,
        masters: Vec::new(),
    };
    let mut seen_hedr = false;

    while let Some(chunk) = sub.next_sub_chunk()? {
        match chunk.tag {
            tags::HEDR => {
                sub.expect_len(&[12])?;
                header.version = sub.read_value()?;
                header.record_count = sub.read_value()?;
                header.next_object_id = sub.read_value()?;
                seen_hedr = true;
            }
            tags::CNAM => header.author = Some(sub.read_string()?),
            tags::SNAM => header.description = Some(sub.read_string()?),
            tags::MAST => header.masters.push(MasterFile {
                name: sub.read_string()?,
                size: 0,
            }),
            tags::DATA => {
                let size: u64 = sub.read_value()?;
                match header.masters.last_mut() {
                    Some(master) => master.size = size,
                    None => {
                        return Err(LoadError::CorruptFraming {
                            offset: raw.offset,
                            reason: "master size without a preceding MAST",
                        });
                    }
                }
            }
            tags::ONAM | tags::INTV | tags::INCC | tags::OFST | tags::DELE => sub.skip_remaining(),
            other => return Err(sub.unknown_sub_chunk(other)),
        }
    }

    if !seen_hedr {
        return Err(sub.missing(tags::HEDR));
    }

    debug!(
        "File header for {}: version {}, {} records, {} masters, author {:?}",
        name,
        header.version,
        header.record_count,
        header.masters.len(),
        header.author
    );
    Ok(header)
}
