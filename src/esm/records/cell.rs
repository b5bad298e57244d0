use super::{Record, RecordMeta, record_store_item};
use crate::esm::format::RecordReader;
use crate::esm::store::Spatial;
use crate::esm::types::error::Result;
use crate::esm::types::models::FormId;
use crate::esm::types::tags::{self, Tag, rec};

/// Exterior grid position (`XCLC`), with land flags in newer files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGrid {
    pub x: i32,
    pub y: i32,
    pub land_flags: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub meta: RecordMeta,
    pub editor_id: String,
    pub full_name: String,
    pub flags: u32,
    pub grid: Option<CellGrid>,
    pub water_height: Option<f32>,
    pub regions: Vec<FormId>,
    pub climate: Option<FormId>,
    pub water: Option<FormId>,
    pub owner: Option<FormId>,
}

impl Cell {
    pub const INTERIOR: u32 = 0x01;
    pub const HAS_WATER: u32 = 0x02;

    pub fn is_exterior(&self) -> bool {
        self.flags & Self::INTERIOR == 0
    }

    /// Name shown to the player, falling back to the editor id.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.editor_id
        } else {
            &self.full_name
        }
    }
}

impl Record for Cell {
    const KIND: Tag = rec::CELL;

    fn load(reader: &mut RecordReader<'_>) -> Result<Option<Self>> {
        let mut cell = Cell {
            meta: reader.meta(),
            editor_id: String::new(),
            full_name: String::new(),
            flags: 0,
            grid: None,
            water_height: None,
            regions: Vec::new(),
            climate: None,
            water: None,
            owner: None,
        };
        let mut seen_data = false;

        while let Some(sub) = reader.next_sub_chunk()? {
            match sub.tag {
                tags::EDID => cell.editor_id = reader.read_string()?,
                tags::FULL => cell.full_name = reader.read_string()?,
                tags::DATA => {
                    seen_data = true;
                    cell.flags = match reader.expect_len(&[1, 2, 4])? {
                        1 => reader.read_value::<u8>()? as u32,
                        2 => reader.read_value::<u16>()? as u32,
                        _ => reader.read_value()?,
                    };
                }
                tags::XCLC => {
                    let len = reader.expect_len(&[8, 12])?;
                    cell.grid = Some(CellGrid {
                        x: reader.read_value()?,
                        y: reader.read_value()?,
                        land_flags: if len == 12 {
                            Some(reader.read_value()?)
                        } else {
                            None
                        },
                    });
                }
                tags::XCLW => cell.water_height = Some(reader.read_value()?),
                tags::XCLR => {
                    if sub.len % 4 != 0 {
                        return Err(reader.unexpected_length(sub.len));
                    }
                    for _ in 0..sub.len / 4 {
                        cell.regions.extend(reader.read_form_id()?);
                    }
                }
                tags::XCCM => cell.climate = reader.read_form_id()?,
                tags::XCWT => cell.water = reader.read_form_id()?,
                tags::XOWN => cell.owner = reader.read_form_id()?,
                tags::XCLL | tags::XCMT | tags::XRNK | tags::XGLB => reader.skip_remaining(),
                other => return Err(reader.unknown_sub_chunk(other)),
            }
        }

        if cell.is_exterior() && cell.grid.is_none() {
            if !cell.meta.flags.is_deleted() {
                return Err(reader.missing(tags::XCLC));
            }
            // Without DATA or a grid, a tombstone can only name an interior
            if seen_data || cell.editor_id.is_empty() {
                return Ok(None);
            }
            cell.flags |= Self::INTERIOR;
        }
        Ok(Some(cell))
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

record_store_item!(Cell, "Cell");

impl Spatial for Cell {
    fn is_interior(&self) -> bool {
        !self.is_exterior()
    }

    fn name(&self) -> &str {
        &self.editor_id
    }

    fn grid(&self) -> (i32, i32) {
        self.grid.map_or((0, 0), |grid| (grid.x, grid.y))
    }
}
