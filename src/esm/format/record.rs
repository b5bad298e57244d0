//! Sub-chunk cursor over the payload of a single record.

use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::Encoding;
use log::trace;

use crate::esm::codec::text::decode_until_nul;
use crate::esm::records::RecordMeta;
use crate::esm::resolver::FileContext;
use crate::esm::types::error::{LoadError, Result};
use crate::esm::types::models::{FormId, RecordHeader, SubChunkHeader};
use crate::esm::types::tags::{self, Tag};

/// Size of a sub-chunk header: tag plus `u16` length.
const SUB_CHUNK_HEADER_SIZE: usize = 6;

/// Fixed-width little-endian values readable from a sub-chunk.
pub trait ReadValue: Sized {
    const SIZE: usize;

    /// Decodes from exactly `SIZE` bytes.
    fn decode(bytes: &[u8]) -> Self;
}

impl ReadValue for u8 {
    const SIZE: usize = 1;
    fn decode(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

impl ReadValue for i8 {
    const SIZE: usize = 1;
    fn decode(bytes: &[u8]) -> Self {
        bytes[0] as i8
    }
}

impl ReadValue for u16 {
    const SIZE: usize = 2;
    fn decode(bytes: &[u8]) -> Self {
        LittleEndian::read_u16(bytes)
    }
}

impl ReadValue for i16 {
    const SIZE: usize = 2;
    fn decode(bytes: &[u8]) -> Self {
        LittleEndian::read_i16(bytes)
    }
}

impl ReadValue for u32 {
    const SIZE: usize = 4;
    fn decode(bytes: &[u8]) -> Self {
        LittleEndian::read_u32(bytes)
    }
}

impl ReadValue for i32 {
    const SIZE: usize = 4;
    fn decode(bytes: &[u8]) -> Self {
        LittleEndian::read_i32(bytes)
    }
}

impl ReadValue for u64 {
    const SIZE: usize = 8;
    fn decode(bytes: &[u8]) -> Self {
        LittleEndian::read_u64(bytes)
    }
}

impl ReadValue for f32 {
    const SIZE: usize = 4;
    fn decode(bytes: &[u8]) -> Self {
        LittleEndian::read_f32(bytes)
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenSubChunk {
    tag: Tag,
    end: usize,
}

/// Walks the sub-chunks of one record payload.
///
/// Reads are bounded by the current sub-chunk. Moving to the next sub-chunk
/// discards whatever the loader left unread in the current one.
pub struct RecordReader<'a> {
    header: RecordHeader,
    data: &'a [u8],
    pos: usize,
    current: Option<OpenSubChunk>,
    context: &'a FileContext,
    encoding: &'static Encoding,
    references: Vec<FormId>,
}

impl<'a> RecordReader<'a> {
    /// `data` is the record payload with compression already removed.
    pub fn new(
        header: RecordHeader,
        data: &'a [u8],
        context: &'a FileContext,
        encoding: &'static Encoding,
    ) -> Self {
        RecordReader {
            header,
            data,
            pos: 0,
            current: None,
            context,
            encoding,
            references: Vec::new(),
        }
    }

    pub fn header(&self) -> &RecordHeader {
        &self.header
    }

    pub fn kind(&self) -> Tag {
        self.header.kind
    }

    /// Resolved identifier of the record being read.
    pub fn form_id(&self) -> FormId {
        self.context.resolve(self.header.form_id)
    }

    /// Identity and provenance of the record being read.
    pub fn meta(&self) -> RecordMeta {
        RecordMeta {
            form_id: self.form_id(),
            flags: self.header.flags,
            source: self.context.load_index(),
        }
    }

    /// Advances to the next sub-chunk.
    ///
    /// `XXXX` size overrides are consumed here and applied to the sub-chunk
    /// that follows them. Returns `Ok(None)` once the payload is exhausted.
    pub fn next_sub_chunk(&mut self) -> Result<Option<SubChunkHeader>> {
        if let Some(open) = self.current.take() {
            self.pos = open.end;
        }

        let mut oversize: Option<usize> = None;
        loop {
            let remaining = self.data.len() - self.pos;
            if remaining == 0 {
                if oversize.is_some() {
                    return Err(LoadError::CorruptFraming {
                        offset: self.pos,
                        reason: "XXXX size override not followed by a sub-chunk",
                    });
                }
                return Ok(None);
            }
            if remaining < SUB_CHUNK_HEADER_SIZE {
                return Err(LoadError::CorruptFraming {
                    offset: self.pos,
                    reason: "trailing bytes shorter than a sub-chunk header",
                });
            }

            let tag = Tag::from_slice(&self.data[self.pos..]);
            let declared = LittleEndian::read_u16(&self.data[self.pos + 4..]) as usize;
            let start = self.pos + SUB_CHUNK_HEADER_SIZE;
            let len = oversize.take().unwrap_or(declared);

            if len > self.data.len() - start {
                return Err(LoadError::TruncatedRecord {
                    kind: self.header.kind,
                    tag,
                    need: len,
                    have: self.data.len() - start,
                });
            }

            if tag == tags::XXXX {
                if len != 4 {
                    return Err(LoadError::UnexpectedLength {
                        kind: self.header.kind,
                        tag,
                        found: len,
                    });
                }
                oversize = Some(LittleEndian::read_u32(&self.data[start..]) as usize);
                self.pos = start + 4;
                continue;
            }

            trace!("{} sub-chunk {} ({} bytes)", self.header.kind, tag, len);
            self.pos = start;
            self.current = Some(OpenSubChunk {
                tag,
                end: start + len,
            });
            return Ok(Some(SubChunkHeader { tag, len }));
        }
    }

    /// Tag of the current sub-chunk, or the record kind outside of one.
    fn current_tag(&self) -> Tag {
        self.current.map_or(self.header.kind, |open| open.tag)
    }

    fn current_end(&self) -> usize {
        self.current.map_or(self.pos, |open| open.end)
    }

    /// Unread bytes left in the current sub-chunk.
    pub fn remaining(&self) -> usize {
        self.current_end() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let have = self.remaining();
        if n > have {
            return Err(LoadError::TruncatedRecord {
                kind: self.header.kind,
                tag: self.current_tag(),
                need: n,
                have,
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_value<T: ReadValue>(&mut self) -> Result<T> {
        self.take(T::SIZE).map(T::decode)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    pub fn read_remaining(&mut self) -> &'a [u8] {
        let bytes = &self.data[self.pos..self.current_end()];
        self.pos = self.current_end();
        bytes
    }

    pub fn skip_remaining(&mut self) {
        self.pos = self.current_end();
    }

    /// Reads a string up to its NUL terminator or the end of the sub-chunk,
    /// whichever comes first. The terminator is consumed.
    pub fn read_string(&mut self) -> Result<String> {
        let rest = &self.data[self.pos..self.current_end()];
        let consumed = match rest.iter().position(|&b| b == 0) {
            Some(nul) => nul + 1,
            None => rest.len(),
        };
        self.pos += consumed;
        Ok(decode_until_nul(rest, self.encoding))
    }

    /// Reads a file-local identifier and resolves it.
    ///
    /// A zero reference means "none". Every other reference is recorded so
    /// that it can be checked once all files are loaded.
    pub fn read_form_id(&mut self) -> Result<Option<FormId>> {
        let raw: u32 = self.read_value()?;
        if raw == 0 {
            return Ok(None);
        }
        let target = self.context.resolve(raw);
        self.references.push(target);
        Ok(Some(target))
    }

    /// Fails unless the current sub-chunk has one of the `expected` lengths.
    pub fn expect_len(&self, expected: &[usize]) -> Result<usize> {
        let found = self.remaining();
        if expected.contains(&found) {
            Ok(found)
        } else {
            Err(self.unexpected_length(found))
        }
    }

    pub fn unexpected_length(&self, found: usize) -> LoadError {
        LoadError::UnexpectedLength {
            kind: self.header.kind,
            tag: self.current_tag(),
            found,
        }
    }

    pub fn unknown_sub_chunk(&self, tag: Tag) -> LoadError {
        LoadError::UnknownSubChunk {
            tag,
            kind: self.header.kind,
        }
    }

    pub fn missing(&self, tag: Tag) -> LoadError {
        LoadError::MissingSubChunk {
            kind: self.header.kind,
            tag,
        }
    }

    /// Hands over the references collected while reading.
    pub fn take_references(&mut self) -> Vec<FormId> {
        std::mem::take(&mut self.references)
    }
}
