//! Data structures representing plugin framing and identifiers.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};

use super::tags::Tag;

/// A process-wide record identifier.
///
/// The top byte is the load-order index of the file that anchors the object,
/// the low 24 bits are the object index within that file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FormId(u32);

impl FormId {
    pub const OBJECT_MASK: u32 = 0x00FF_FFFF;

    pub fn new(file_index: u8, object_index: u32) -> Self {
        FormId(((file_index as u32) << 24) | (object_index & Self::OBJECT_MASK))
    }

    pub fn from_raw(raw: u32) -> Self {
        FormId(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    pub fn file_index(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn object_index(&self) -> u32 {
        self.0 & Self::OBJECT_MASK
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

impl fmt::Debug for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FormId({:08X})", self.0)
    }
}

/// Record header flags.
///
/// Bit 0x01: Master file (file header only)
/// Bit 0x20: Deleted
/// Bit 0x1000: Ignored
/// Bit 0x40000: Payload is zlib-compressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordFlags(pub u32);

impl RecordFlags {
    pub const MASTER: u32 = 0x0000_0001;
    pub const DELETED: u32 = 0x0000_0020;
    pub const IGNORED: u32 = 0x0000_1000;
    pub const COMPRESSED: u32 = 0x0004_0000;

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_master(&self) -> bool {
        self.0 & Self::MASTER != 0
    }

    pub fn is_deleted(&self) -> bool {
        self.0 & Self::DELETED != 0
    }

    pub fn is_ignored(&self) -> bool {
        self.0 & Self::IGNORED != 0
    }

    pub fn is_compressed(&self) -> bool {
        self.0 & Self::COMPRESSED != 0
    }
}

/// Record and group header layout.
///
/// Older files use 20-byte headers; they are recognised by the `HEDR`
/// sub-chunk tag sitting at offset 20 of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderVariant {
    Short,
    Long,
}

impl HeaderVariant {
    pub fn detect(data: &[u8]) -> Self {
        if data.len() >= 24 && &data[20..24] == b"HEDR" {
            HeaderVariant::Short
        } else {
            HeaderVariant::Long
        }
    }

    pub fn size(&self) -> usize {
        match self {
            HeaderVariant::Short => 20,
            HeaderVariant::Long => 24,
        }
    }
}

/// Header preceding a record's sub-chunks.
#[derive(Debug, Clone, Copy)]
pub struct RecordHeader {
    pub kind: Tag,
    pub data_size: u32,
    pub flags: RecordFlags,
    /// File-local identifier, before resolution.
    pub form_id: u32,
    pub revision: u32,
    /// Present only in the 24-byte header variant.
    pub form_version: Option<u16>,
}

impl RecordHeader {
    /// Parses a header from exactly `variant.size()` bytes.
    pub(crate) fn parse(bytes: &[u8], variant: HeaderVariant) -> Self {
        RecordHeader {
            kind: Tag::from_slice(&bytes[0..4]),
            data_size: LittleEndian::read_u32(&bytes[4..8]),
            flags: RecordFlags(LittleEndian::read_u32(&bytes[8..12])),
            form_id: LittleEndian::read_u32(&bytes[12..16]),
            revision: LittleEndian::read_u32(&bytes[16..20]),
            form_version: match variant {
                HeaderVariant::Long => Some(LittleEndian::read_u16(&bytes[20..22])),
                HeaderVariant::Short => None,
            },
        }
    }
}

/// Header of a `GRUP` container.
#[derive(Debug, Clone, Copy)]
pub struct GroupHeader {
    /// Total size including this header.
    pub size: u32,
    pub label: [u8; 4],
    pub group_type: i32,
    pub stamp: u16,
}

impl GroupHeader {
    pub(crate) fn parse(bytes: &[u8]) -> Self {
        GroupHeader {
            size: LittleEndian::read_u32(&bytes[4..8]),
            label: [bytes[8], bytes[9], bytes[10], bytes[11]],
            group_type: LittleEndian::read_i32(&bytes[12..16]),
            stamp: LittleEndian::read_u16(&bytes[16..18]),
        }
    }

    /// The label read as a record kind (meaningful for top-level groups).
    pub fn label_tag(&self) -> Tag {
        Tag(self.label)
    }
}

/// Tag and effective length of a sub-chunk, after any `XXXX` override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubChunkHeader {
    pub tag: Tag,
    pub len: usize,
}

/// A master file named in a plugin's header.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterFile {
    pub name: String,
    pub size: u64,
}

/// Parsed `TES4` file header.
#[derive(Debug, Clone)]
pub struct FileHeader {
    /// Name the file was loaded under.
    pub name: String,
    pub variant: HeaderVariant,
    pub flags: RecordFlags,
    pub version: f32,
    pub record_count: i32,
    pub next_object_id: u32,
    pub author: Option<String>,
    pub description: Option<String>,
    pub masters: Vec<MasterFile>,
}

impl FileHeader {
    pub fn is_master(&self) -> bool {
        self.flags.is_master()
    }
}
