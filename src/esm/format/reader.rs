//! Sequential walker over the records and groups of one file.

use std::borrow::Cow;

use log::trace;

use crate::esm::codec::compression::inflate_record;
use crate::esm::types::error::{LoadError, Result};
use crate::esm::types::models::{GroupHeader, HeaderVariant, RecordHeader};
use crate::esm::types::tags::{Tag, rec};

/// One record as it sits in the file: its header and raw payload.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    pub header: RecordHeader,
    /// File offset of the record header.
    pub offset: usize,
    payload: &'a [u8],
}

impl<'a> RawRecord<'a> {
    pub fn kind(&self) -> Tag {
        self.header.kind
    }

    /// The payload exactly as stored.
    pub fn raw_payload(&self) -> &'a [u8] {
        self.payload
    }

    /// The payload with compression removed.
    pub fn body(&self) -> Result<Cow<'a, [u8]>> {
        if self.header.flags.is_compressed() {
            trace!(
                "Inflating {} record at {:#x} ({} bytes stored)",
                self.header.kind,
                self.offset,
                self.payload.len()
            );
            Ok(Cow::Owned(inflate_record(self.payload)?))
        } else {
            Ok(Cow::Borrowed(self.payload))
        }
    }
}

#[derive(Debug)]
struct OpenGroup {
    header: GroupHeader,
    end: usize,
}

/// Cursor over an in-memory plugin file.
///
/// Groups are entered transparently: [`next_record`](Self::next_record)
/// yields every record in file order, checking that each one and each nested
/// group ends inside its parent.
#[derive(Debug)]
pub struct EsmReader<'a> {
    data: &'a [u8],
    pos: usize,
    variant: HeaderVariant,
    groups: Vec<OpenGroup>,
}

impl<'a> EsmReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        EsmReader {
            data,
            pos: 0,
            variant: HeaderVariant::detect(data),
            groups: Vec::new(),
        }
    }

    pub fn variant(&self) -> HeaderVariant {
        self.variant
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of groups currently entered.
    pub fn depth(&self) -> usize {
        self.groups.len()
    }

    /// Labels of the groups currently entered, outermost first.
    pub fn group_labels(&self) -> impl Iterator<Item = Tag> + '_ {
        self.groups.iter().map(|g| g.header.label_tag())
    }

    /// Tag of the next header without consuming it.
    pub fn peek_tag(&self) -> Option<Tag> {
        self.data
            .get(self.pos..self.pos + 4)
            .map(Tag::from_slice)
    }

    /// Returns the next record, entering and leaving groups as needed.
    ///
    /// Returns `Ok(None)` once the end of the file is reached with every
    /// group closed.
    pub fn next_record(&mut self) -> Result<Option<RawRecord<'a>>> {
        loop {
            while let Some(group) = self.groups.last() {
                if self.pos < group.end {
                    break;
                }
                if self.pos > group.end {
                    return Err(LoadError::CorruptFraming {
                        offset: self.pos,
                        reason: "contents overrun their group",
                    });
                }
                trace!("Leaving group {} at {:#x}", group.header.label_tag(), self.pos);
                self.groups.pop();
            }

            let limit = self.groups.last().map_or(self.data.len(), |g| g.end);
            if self.pos == limit {
                return Ok(None);
            }

            let header_size = self.variant.size();
            if limit - self.pos < header_size {
                return Err(LoadError::CorruptFraming {
                    offset: self.pos,
                    reason: "truncated record header",
                });
            }
            let start = self.pos;
            let bytes = &self.data[start..start + header_size];

            if Tag::from_slice(bytes) == rec::GRUP {
                let header = GroupHeader::parse(bytes);
                let size = header.size as usize;
                if size < header_size {
                    return Err(LoadError::CorruptFraming {
                        offset: start,
                        reason: "group smaller than its header",
                    });
                }
                if size > limit - start {
                    return Err(LoadError::CorruptFraming {
                        offset: start,
                        reason: "group overruns its parent",
                    });
                }
                trace!(
                    "Entering group {} (type {}, {} bytes) at {:#x}",
                    header.label_tag(),
                    header.group_type,
                    size,
                    start
                );
                self.pos = start + header_size;
                self.groups.push(OpenGroup {
                    header,
                    end: start + size,
                });
                continue;
            }

            let header = RecordHeader::parse(bytes, self.variant);
            let payload_start = start + header_size;
            let payload_len = header.data_size as usize;
            if payload_len > limit - payload_start {
                return Err(LoadError::CorruptFraming {
                    offset: start,
                    reason: "record payload overruns its group or the file",
                });
            }
            self.pos = payload_start + payload_len;
            return Ok(Some(RawRecord {
                header,
                offset: start,
                payload: &self.data[payload_start..self.pos],
            }));
        }
    }
}
