//! Synthetic plugin builder shared by the integration tests.
//!
//! Builds files byte by byte in the on-disk layout: a `TES4` header record
//! followed by records and groups, all little-endian.

#![allow(dead_code)]

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;

pub const DELETED: u32 = 0x20;
pub const IGNORED: u32 = 0x1000;
pub const COMPRESSED: u32 = 0x40000;

// ── Sub-chunks ───────────────────────────────────────────────────────────────

/// The sub-chunk payload of one record.
#[derive(Debug, Clone, Default)]
pub struct Fields(Vec<u8>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(mut self, tag: &[u8; 4], data: &[u8]) -> Self {
        self.0.extend_from_slice(tag);
        self.0.extend_from_slice(&(data.len() as u16).to_le_bytes());
        self.0.extend_from_slice(data);
        self
    }

    /// NUL-terminated string.
    pub fn string(self, tag: &[u8; 4], text: &str) -> Self {
        let mut data = text.as_bytes().to_vec();
        data.push(0);
        self.raw(tag, &data)
    }

    pub fn u8(self, tag: &[u8; 4], value: u8) -> Self {
        self.raw(tag, &[value])
    }

    pub fn u32(self, tag: &[u8; 4], value: u32) -> Self {
        self.raw(tag, &value.to_le_bytes())
    }

    pub fn i32(self, tag: &[u8; 4], value: i32) -> Self {
        self.raw(tag, &value.to_le_bytes())
    }

    pub fn f32(self, tag: &[u8; 4], value: f32) -> Self {
        self.raw(tag, &value.to_le_bytes())
    }

    pub fn pair(self, tag: &[u8; 4], a: i32, b: i32) -> Self {
        let mut data = a.to_le_bytes().to_vec();
        data.extend_from_slice(&b.to_le_bytes());
        self.raw(tag, &data)
    }

    /// A sub-chunk sized through a preceding `XXXX` marker.
    pub fn oversize(mut self, tag: &[u8; 4], data: &[u8]) -> Self {
        self = self.u32(b"XXXX", data.len() as u32);
        self.0.extend_from_slice(tag);
        self.0.extend_from_slice(&0u16.to_le_bytes());
        self.0.extend_from_slice(data);
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

/// `DATA` for a 10-byte door stat block.
pub fn door_data(flags: u8, door_type: u8, teaches: i8, value: u32) -> Vec<u8> {
    let mut data = vec![flags, door_type, teaches as u8, 0];
    data.extend_from_slice(&value.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data
}

pub fn door(editor_id: &str, full_name: &str, script: u32) -> Fields {
    Fields::new()
        .string(b"EDID", editor_id)
        .string(b"FULL", full_name)
        .raw(b"DATA", &door_data(0, 1, -1, 25))
        .u32(b"SCRI", script)
}

pub fn script(editor_id: &str, source: &str) -> Fields {
    Fields::new()
        .string(b"EDID", editor_id)
        .string(b"SCTX", source)
}

pub fn interior_cell(editor_id: &str) -> Fields {
    Fields::new()
        .string(b"EDID", editor_id)
        .u8(b"DATA", 0x01)
}

pub fn exterior_cell(editor_id: &str, x: i32, y: i32) -> Fields {
    Fields::new()
        .string(b"EDID", editor_id)
        .u8(b"DATA", 0x00)
        .pair(b"XCLC", x, y)
}

/// A pathgrid with `points` points chained by edges.
pub fn pathgrid(cell: &str, x: i32, y: i32, points: usize) -> Fields {
    let mut data = x.to_le_bytes().to_vec();
    data.extend_from_slice(&y.to_le_bytes());
    data.extend_from_slice(&256u16.to_le_bytes());
    data.extend_from_slice(&(points as u16).to_le_bytes());

    let mut point_bytes = Vec::new();
    for i in 0..points {
        for coord in [i as i32 * 10, 0, 0] {
            point_bytes.extend_from_slice(&coord.to_le_bytes());
        }
        point_bytes.extend_from_slice(&[1, 1, 0, 0]);
    }

    let mut edge_bytes = Vec::new();
    for i in 1..points {
        edge_bytes.extend_from_slice(&(i as u32 - 1).to_le_bytes());
        edge_bytes.extend_from_slice(&(i as u32).to_le_bytes());
    }

    let fields = Fields::new().raw(b"DATA", &data).string(b"NAME", cell);
    if points == 0 {
        fields
    } else {
        fields.raw(b"PGRP", &point_bytes).raw(b"PGRC", &edge_bytes)
    }
}

// ── Files ────────────────────────────────────────────────────────────────────

/// Assembles one plugin file.
pub struct EsmBuilder {
    out: Vec<u8>,
    short_headers: bool,
    open_groups: Vec<usize>,
}

impl EsmBuilder {
    /// A file with 24-byte headers.
    pub fn new(masters: &[&str]) -> Self {
        Self::with_header(masters, false, 0)
    }

    /// A file with the older 20-byte headers.
    pub fn short(masters: &[&str]) -> Self {
        Self::with_header(masters, true, 0)
    }

    /// A file whose header carries the master flag.
    pub fn master(masters: &[&str]) -> Self {
        Self::with_header(masters, false, 0x01)
    }

    fn with_header(masters: &[&str], short_headers: bool, flags: u32) -> Self {
        let mut hedr = 1.0f32.to_le_bytes().to_vec();
        hedr.extend_from_slice(&0i32.to_le_bytes());
        hedr.extend_from_slice(&0x800u32.to_le_bytes());

        let mut fields = Fields::new().raw(b"HEDR", &hedr).string(b"CNAM", "tests");
        for master in masters {
            fields = fields
                .string(b"MAST", master)
                .raw(b"DATA", &0u64.to_le_bytes());
        }

        let builder = EsmBuilder {
            out: Vec::new(),
            short_headers,
            open_groups: Vec::new(),
        };
        builder.record_with_flags(b"TES4", 0, flags, fields)
    }

    fn header(&mut self, tag: &[u8; 4], size: u32, flags_or_label: &[u8], form_id: u32) {
        self.out.extend_from_slice(tag);
        self.out.extend_from_slice(&size.to_le_bytes());
        self.out.extend_from_slice(flags_or_label);
        self.out.extend_from_slice(&form_id.to_le_bytes());
        self.out.extend_from_slice(&0u32.to_le_bytes());
        if !self.short_headers {
            self.out.extend_from_slice(&0u32.to_le_bytes());
        }
    }

    pub fn record(self, kind: &[u8; 4], form_id: u32, fields: Fields) -> Self {
        self.record_with_flags(kind, form_id, 0, fields)
    }

    pub fn record_with_flags(mut self, kind: &[u8; 4], form_id: u32, flags: u32, fields: Fields) -> Self {
        let payload = fields.bytes();
        self.header(kind, payload.len() as u32, &flags.to_le_bytes(), form_id);
        self.out.extend_from_slice(payload);
        self
    }

    /// A record whose payload is stored zlib-compressed.
    pub fn compressed_record(mut self, kind: &[u8; 4], form_id: u32, fields: Fields) -> Self {
        let plain = fields.bytes();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(plain).expect("compress record");
        let compressed = encoder.finish().expect("finish zlib stream");

        let mut payload = (plain.len() as u32).to_le_bytes().to_vec();
        payload.extend_from_slice(&compressed);
        self.header(kind, payload.len() as u32, &COMPRESSED.to_le_bytes(), form_id);
        self.out.extend_from_slice(&payload);
        self
    }

    /// Raw bytes appended as-is.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.out.extend_from_slice(bytes);
        self
    }

    pub fn begin_group(mut self, label: &[u8; 4]) -> Self {
        self.open_groups.push(self.out.len());
        // Size is patched by end_group; stamp and type are zero
        self.out.extend_from_slice(b"GRUP");
        self.out.extend_from_slice(&0u32.to_le_bytes());
        self.out.extend_from_slice(label);
        self.out.extend_from_slice(&0i32.to_le_bytes());
        self.out.extend_from_slice(&0u32.to_le_bytes());
        if !self.short_headers {
            self.out.extend_from_slice(&0u32.to_le_bytes());
        }
        self
    }

    pub fn end_group(mut self) -> Self {
        let start = self.open_groups.pop().expect("end_group without begin_group");
        let size = (self.out.len() - start) as u32;
        self.out[start + 4..start + 8].copy_from_slice(&size.to_le_bytes());
        self
    }

    pub fn build(self) -> Vec<u8> {
        assert!(self.open_groups.is_empty(), "unclosed group");
        self.out
    }
}
