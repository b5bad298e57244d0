use super::{Record, RecordMeta, record_store_item};
use crate::esm::format::RecordReader;
use crate::esm::store::Gridded;
use crate::esm::types::error::Result;
use crate::esm::types::tags::{self, Tag, rec};

/// Delta-encoded height map of one land square (`VHGT`).
#[derive(Debug, Clone, PartialEq)]
pub struct LandHeights {
    pub offset: f32,
    /// Row-major deltas, `SIDE * SIDE` of them.
    pub deltas: Vec<i8>,
}

impl LandHeights {
    /// Vertices along one edge.
    pub const SIDE: usize = 33;
    /// World units per stored height step.
    pub const SCALE: f32 = 8.0;

    const ENCODED_LEN: usize = 4 + Self::SIDE * Self::SIDE + 3;

    fn decode(reader: &mut RecordReader<'_>) -> Result<Self> {
        reader.expect_len(&[Self::ENCODED_LEN])?;
        let offset = reader.read_value()?;
        let deltas = reader
            .read_bytes(Self::SIDE * Self::SIDE)?
            .iter()
            .map(|&b| b as i8)
            .collect();
        reader.skip_remaining();
        Ok(LandHeights { offset, deltas })
    }

    /// Absolute vertex heights, row-major.
    ///
    /// The first delta of each row is relative to the first vertex of the
    /// previous row; every other delta is relative to its left neighbour.
    pub fn heights(&self) -> Vec<f32> {
        let side = Self::SIDE;
        let mut heights = Vec::with_capacity(side * side);
        let mut row_start = self.offset;
        for row in self.deltas.chunks_exact(side) {
            row_start += row[0] as f32;
            let mut height = row_start;
            heights.push(height * Self::SCALE);
            for &delta in &row[1..] {
                height += delta as f32;
                heights.push(height * Self::SCALE);
            }
        }
        heights
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Land {
    pub meta: RecordMeta,
    pub x: i32,
    pub y: i32,
    pub flags: u32,
    pub heights: Option<LandHeights>,
    /// Plugin-local land texture slots; 0 means the default texture.
    pub textures: Vec<u16>,
}

impl Record for Land {
    const KIND: Tag = rec::LAND;

    fn load(reader: &mut RecordReader<'_>) -> Result<Option<Self>> {
        let mut land = Land {
            meta: reader.meta(),
            x: 0,
            y: 0,
            flags: 0,
            heights: None,
            textures: Vec::new(),
        };
        let mut seen_grid = false;

        while let Some(sub) = reader.next_sub_chunk()? {
            match sub.tag {
                tags::INTV => {
                    reader.expect_len(&[8])?;
                    land.x = reader.read_value()?;
                    land.y = reader.read_value()?;
                    seen_grid = true;
                }
                tags::DATA => land.flags = reader.read_value()?,
                tags::VHGT => land.heights = Some(LandHeights::decode(reader)?),
                tags::VTEX => {
                    if sub.len % 2 != 0 {
                        return Err(reader.unexpected_length(sub.len));
                    }
                    land.textures = reader
                        .read_remaining()
                        .chunks_exact(2)
                        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                        .collect();
                }
                tags::VNML | tags::VCLR | tags::BTXT | tags::ATXT | tags::VTXT => {
                    reader.skip_remaining()
                }
                other => return Err(reader.unknown_sub_chunk(other)),
            }
        }

        match (seen_grid, land.meta.flags.is_deleted()) {
            (true, _) => Ok(Some(land)),
            (false, true) => Ok(None),
            (false, false) => Err(reader.missing(tags::INTV)),
        }
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

record_store_item!(Land, "Land");

impl Gridded for Land {
    fn grid(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}
