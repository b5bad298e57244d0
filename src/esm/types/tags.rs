//! Four-character codes used to frame records, groups and sub-chunks.
//!
//! Record kinds live in [`rec`]; sub-chunk tags are declared at module level.
//! The same code can appear in both namespaces (`DATA` is a sub-chunk tag in
//! almost every record kind), so loaders always match on the sub-chunk
//! constants and the catalogue always matches on [`rec`].

use std::fmt;

/// A four-byte record, group or sub-chunk code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub const fn new(code: &[u8; 4]) -> Self {
        Tag(*code)
    }

    /// Builds a tag from the first four bytes of `bytes`.
    ///
    /// Callers guarantee `bytes.len() >= 4`.
    pub(crate) fn from_slice(bytes: &[u8]) -> Self {
        Tag([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Returns the code as text when all four bytes are printable ASCII.
    pub fn as_str(&self) -> Option<&str> {
        if self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            std::str::from_utf8(&self.0).ok()
        } else {
            None
        }
    }

    /// Semantic role of this tag when used as a sub-chunk.
    pub fn role(&self) -> Option<TagRole> {
        TagRole::of(*self)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => f.write_str(text),
            None => write!(f, "{:#010x}", u32::from_le_bytes(self.0)),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}

impl From<&[u8; 4]> for Tag {
    fn from(code: &[u8; 4]) -> Self {
        Tag(*code)
    }
}

/// Record kind codes.
pub mod rec {
    use super::Tag;

    pub const TES4: Tag = Tag::new(b"TES4");
    pub const GRUP: Tag = Tag::new(b"GRUP");
    pub const DOOR: Tag = Tag::new(b"DOOR");
    pub const BOOK: Tag = Tag::new(b"BOOK");
    pub const CREA: Tag = Tag::new(b"CREA");
    pub const SCPT: Tag = Tag::new(b"SCPT");
    pub const SOUN: Tag = Tag::new(b"SOUN");
    pub const STAT: Tag = Tag::new(b"STAT");
    pub const SKIL: Tag = Tag::new(b"SKIL");
    pub const MGEF: Tag = Tag::new(b"MGEF");
    pub const LTEX: Tag = Tag::new(b"LTEX");
    pub const LAND: Tag = Tag::new(b"LAND");
    pub const CELL: Tag = Tag::new(b"CELL");
    pub const PGRD: Tag = Tag::new(b"PGRD");
}

// Framing
pub const XXXX: Tag = Tag::new(b"XXXX");

// File header
pub const HEDR: Tag = Tag::new(b"HEDR");
pub const CNAM: Tag = Tag::new(b"CNAM");
pub const SNAM: Tag = Tag::new(b"SNAM");
pub const MAST: Tag = Tag::new(b"MAST");
pub const ONAM: Tag = Tag::new(b"ONAM");
pub const INTV: Tag = Tag::new(b"INTV");
pub const INCC: Tag = Tag::new(b"INCC");
pub const OFST: Tag = Tag::new(b"OFST");
pub const DELE: Tag = Tag::new(b"DELE");

// Common
pub const EDID: Tag = Tag::new(b"EDID");
pub const FULL: Tag = Tag::new(b"FULL");
pub const DATA: Tag = Tag::new(b"DATA");
pub const MODL: Tag = Tag::new(b"MODL");
pub const MODB: Tag = Tag::new(b"MODB");
pub const MODT: Tag = Tag::new(b"MODT");
pub const ICON: Tag = Tag::new(b"ICON");
pub const SCRI: Tag = Tag::new(b"SCRI");
pub const DESC: Tag = Tag::new(b"DESC");
pub const INDX: Tag = Tag::new(b"INDX");
pub const NAME: Tag = Tag::new(b"NAME");
pub const FNAM: Tag = Tag::new(b"FNAM");
pub const ANAM: Tag = Tag::new(b"ANAM");
pub const BNAM: Tag = Tag::new(b"BNAM");
pub const ENAM: Tag = Tag::new(b"ENAM");
pub const GNAM: Tag = Tag::new(b"GNAM");
pub const HNAM: Tag = Tag::new(b"HNAM");
pub const JNAM: Tag = Tag::new(b"JNAM");
pub const MNAM: Tag = Tag::new(b"MNAM");
pub const RNAM: Tag = Tag::new(b"RNAM");
pub const TNAM: Tag = Tag::new(b"TNAM");
pub const WNAM: Tag = Tag::new(b"WNAM");
pub const ZNAM: Tag = Tag::new(b"ZNAM");

// Creature
pub const NIFZ: Tag = Tag::new(b"NIFZ");
pub const NIFT: Tag = Tag::new(b"NIFT");
pub const SPLO: Tag = Tag::new(b"SPLO");
pub const CNTO: Tag = Tag::new(b"CNTO");
pub const ACBS: Tag = Tag::new(b"ACBS");
pub const AIDT: Tag = Tag::new(b"AIDT");
pub const PKID: Tag = Tag::new(b"PKID");
pub const KFFZ: Tag = Tag::new(b"KFFZ");
pub const CSCR: Tag = Tag::new(b"CSCR");
pub const CSDT: Tag = Tag::new(b"CSDT");
pub const CSDI: Tag = Tag::new(b"CSDI");
pub const CSDC: Tag = Tag::new(b"CSDC");

// Script
pub const SCHR: Tag = Tag::new(b"SCHR");
pub const SCDA: Tag = Tag::new(b"SCDA");
pub const SCTX: Tag = Tag::new(b"SCTX");
pub const SLSD: Tag = Tag::new(b"SLSD");
pub const SCVR: Tag = Tag::new(b"SCVR");
pub const SCRO: Tag = Tag::new(b"SCRO");
pub const SCRV: Tag = Tag::new(b"SCRV");

// Sound
pub const SNDD: Tag = Tag::new(b"SNDD");
pub const SNDX: Tag = Tag::new(b"SNDX");

// Magic effect
pub const ESCE: Tag = Tag::new(b"ESCE");

// Land
pub const VNML: Tag = Tag::new(b"VNML");
pub const VHGT: Tag = Tag::new(b"VHGT");
pub const VCLR: Tag = Tag::new(b"VCLR");
pub const VTEX: Tag = Tag::new(b"VTEX");
pub const BTXT: Tag = Tag::new(b"BTXT");
pub const ATXT: Tag = Tag::new(b"ATXT");
pub const VTXT: Tag = Tag::new(b"VTXT");

// Cell
pub const XCLC: Tag = Tag::new(b"XCLC");
pub const XCLL: Tag = Tag::new(b"XCLL");
pub const XCLW: Tag = Tag::new(b"XCLW");
pub const XCLR: Tag = Tag::new(b"XCLR");
pub const XCMT: Tag = Tag::new(b"XCMT");
pub const XCCM: Tag = Tag::new(b"XCCM");
pub const XCWT: Tag = Tag::new(b"XCWT");
pub const XOWN: Tag = Tag::new(b"XOWN");
pub const XRNK: Tag = Tag::new(b"XRNK");
pub const XGLB: Tag = Tag::new(b"XGLB");

// Pathgrid
pub const PGRP: Tag = Tag::new(b"PGRP");
pub const PGRC: Tag = Tag::new(b"PGRC");
pub const PGAG: Tag = Tag::new(b"PGAG");
pub const PGRR: Tag = Tag::new(b"PGRR");
pub const PGRI: Tag = Tag::new(b"PGRI");
pub const PGRL: Tag = Tag::new(b"PGRL");

/// What a sub-chunk carries, independent of the record kind it appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRole {
    EditorId,
    FullName,
    DataBlock,
    ModelPath,
    ModelData,
    IconPath,
    ScriptReference,
    SoundReference,
    FormReference,
    Text,
    Index,
    Grid,
    Header,
    Master,
    SizeOverride,
    Geometry,
}

impl TagRole {
    /// Looks up the role of a sub-chunk tag. Tags whose meaning depends on
    /// the enclosing record (e.g. `SNAM`, `ANAM`) report their most common use.
    pub fn of(tag: Tag) -> Option<TagRole> {
        let role = match tag {
            EDID => TagRole::EditorId,
            FULL => TagRole::FullName,
            DATA | ACBS | SCHR | SNDD | SNDX | HNAM => TagRole::DataBlock,
            MODL | FNAM => TagRole::ModelPath,
            MODB | MODT | NIFZ | NIFT => TagRole::ModelData,
            ICON => TagRole::IconPath,
            SCRI => TagRole::ScriptReference,
            SNAM | BNAM | CSDI => TagRole::SoundReference,
            ENAM | SPLO | CNTO | CSCR | SCRO | XCCM | XCWT | XOWN | XCLR | GNAM => {
                TagRole::FormReference
            }
            DESC | SCTX | CNAM | JNAM | MNAM => TagRole::Text,
            INDX => TagRole::Index,
            XCLC | INTV => TagRole::Grid,
            HEDR => TagRole::Header,
            MAST => TagRole::Master,
            XXXX => TagRole::SizeOverride,
            VHGT | VNML | VCLR | VTEX | PGRP | PGRC => TagRole::Geometry,
            _ => return None,
        };
        Some(role)
    }
}

/// Human-readable description of a record kind or sub-chunk tag.
pub fn describe(tag: Tag) -> &'static str {
    match tag {
        rec::TES4 => "file header",
        rec::GRUP => "group",
        rec::DOOR => "door",
        rec::BOOK => "book",
        rec::CREA => "creature",
        rec::SCPT => "script",
        rec::SOUN => "sound",
        rec::STAT => "static object",
        rec::SKIL => "skill",
        rec::MGEF => "magic effect",
        rec::LTEX => "land texture",
        rec::LAND => "land",
        rec::CELL => "cell",
        rec::PGRD => "pathgrid",
        _ => match TagRole::of(tag) {
            Some(TagRole::EditorId) => "editor id",
            Some(TagRole::FullName) => "display name",
            Some(TagRole::DataBlock) => "data block",
            Some(TagRole::ModelPath) => "model path",
            Some(TagRole::ModelData) => "model data",
            Some(TagRole::IconPath) => "icon path",
            Some(TagRole::ScriptReference) => "script reference",
            Some(TagRole::SoundReference) => "sound reference",
            Some(TagRole::FormReference) => "form reference",
            Some(TagRole::Text) => "text",
            Some(TagRole::Index) => "index",
            Some(TagRole::Grid) => "grid coordinates",
            Some(TagRole::Header) => "header data",
            Some(TagRole::Master) => "master file",
            Some(TagRole::SizeOverride) => "oversize marker",
            Some(TagRole::Geometry) => "geometry",
            None => "unknown",
        },
    }
}
