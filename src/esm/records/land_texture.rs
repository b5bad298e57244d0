use super::{Record, RecordMeta, record_store_item};
use crate::esm::format::RecordReader;
use crate::esm::store::SparseIndexed;
use crate::esm::types::error::Result;
use crate::esm::types::tags::{self, Tag, rec};

/// Terrain texture, addressed by a plugin-local index.
#[derive(Debug, Clone, PartialEq)]
pub struct LandTexture {
    pub meta: RecordMeta,
    pub editor_id: String,
    pub index: u32,
    /// Texture file path.
    pub texture: String,
}

impl LandTexture {
    pub const MAX_INDEX: usize = 0xFFFF;
}

impl Record for LandTexture {
    const KIND: Tag = rec::LTEX;

    fn load(reader: &mut RecordReader<'_>) -> Result<Option<Self>> {
        let mut texture = LandTexture {
            meta: reader.meta(),
            editor_id: String::new(),
            index: 0,
            texture: String::new(),
        };
        let mut seen_index = false;

        while let Some(sub) = reader.next_sub_chunk()? {
            match sub.tag {
                tags::EDID => texture.editor_id = reader.read_string()?,
                tags::INDX => {
                    texture.index = reader.read_value()?;
                    seen_index = true;
                }
                tags::ICON => texture.texture = reader.read_string()?,
                tags::HNAM | tags::SNAM | tags::GNAM => reader.skip_remaining(),
                other => return Err(reader.unknown_sub_chunk(other)),
            }
        }

        match (seen_index, texture.meta.flags.is_deleted()) {
            (true, _) => Ok(Some(texture)),
            (false, true) => Ok(None),
            (false, false) => Err(reader.missing(tags::INDX)),
        }
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

record_store_item!(LandTexture, "LandTexture");

impl SparseIndexed for LandTexture {
    const MAX_INDEX: usize = LandTexture::MAX_INDEX;

    fn index(&self) -> u32 {
        self.index
    }
}
