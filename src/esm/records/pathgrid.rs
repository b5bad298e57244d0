use super::{Record, RecordMeta};
use crate::esm::format::RecordReader;
use crate::esm::store::{Spatial, StoreItem};
use crate::esm::types::error::Result;
use crate::esm::types::models::FormId;
use crate::esm::types::tags::{self, Tag, rec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathgridPoint {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub auto_generated: bool,
    pub connection_count: u8,
}

impl PathgridPoint {
    const ENCODED_LEN: usize = 16;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathgridEdge {
    pub from: u32,
    pub to: u32,
}

/// Navigation graph of one cell.
///
/// A pathgrid has no grid flag of its own: it counts as interior when it sits
/// at `(0, 0)` and names an interior cell, which the catalogue decides from
/// the cell store before the pathgrid store is set up.
#[derive(Debug, Clone, PartialEq)]
pub struct Pathgrid {
    pub meta: RecordMeta,
    /// Name of the cell the grid belongs to.
    pub cell: String,
    pub x: i32,
    pub y: i32,
    pub granularity: u16,
    pub points: Vec<PathgridPoint>,
    pub edges: Vec<PathgridEdge>,
    pub interior: bool,
}

impl Pathgrid {
    /// A grid without points or edges removes any earlier grid for its cell.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() || self.edges.is_empty()
    }
}

impl Record for Pathgrid {
    const KIND: Tag = rec::PGRD;

    fn load(reader: &mut RecordReader<'_>) -> Result<Option<Self>> {
        let mut grid = Pathgrid {
            meta: reader.meta(),
            cell: String::new(),
            x: 0,
            y: 0,
            granularity: 0,
            points: Vec::new(),
            edges: Vec::new(),
            interior: false,
        };
        let mut seen_data = false;

        while let Some(sub) = reader.next_sub_chunk()? {
            match sub.tag {
                tags::DATA => {
                    reader.expect_len(&[12])?;
                    seen_data = true;
                    grid.x = reader.read_value()?;
                    grid.y = reader.read_value()?;
                    grid.granularity = reader.read_value()?;
                    // Point count repeats the length of PGRP
                    reader.read_bytes(2)?;
                }
                tags::NAME => grid.cell = reader.read_string()?,
                tags::PGRP => {
                    if sub.len % PathgridPoint::ENCODED_LEN != 0 {
                        return Err(reader.unexpected_length(sub.len));
                    }
                    for _ in 0..sub.len / PathgridPoint::ENCODED_LEN {
                        let x = reader.read_value()?;
                        let y = reader.read_value()?;
                        let z = reader.read_value()?;
                        let auto_generated = reader.read_value::<u8>()? != 0;
                        let connection_count = reader.read_value()?;
                        reader.read_bytes(2)?;
                        grid.points.push(PathgridPoint {
                            x,
                            y,
                            z,
                            auto_generated,
                            connection_count,
                        });
                    }
                }
                tags::PGRC => {
                    if sub.len % 8 != 0 {
                        return Err(reader.unexpected_length(sub.len));
                    }
                    for _ in 0..sub.len / 8 {
                        grid.edges.push(PathgridEdge {
                            from: reader.read_value()?,
                            to: reader.read_value()?,
                        });
                    }
                }
                tags::PGAG | tags::PGRR | tags::PGRI | tags::PGRL => reader.skip_remaining(),
                other => return Err(reader.unknown_sub_chunk(other)),
            }
        }
        if !seen_data && grid.meta.flags.is_deleted() {
            return Ok(None);
        }
        Ok(Some(grid))
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

impl StoreItem for Pathgrid {
    const DEBUG_NAME: &'static str = "Pathgrid";

    fn source(&self) -> u8 {
        self.meta.source
    }

    fn is_deleted(&self) -> bool {
        self.meta.flags.is_deleted() || self.is_empty()
    }

    fn form_id(&self) -> FormId {
        self.meta.form_id
    }
}

impl Spatial for Pathgrid {
    fn is_interior(&self) -> bool {
        self.interior
    }

    fn name(&self) -> &str {
        &self.cell
    }

    fn grid(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}
