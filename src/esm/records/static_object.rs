use super::{Record, RecordMeta, record_store_item};
use crate::esm::format::RecordReader;
use crate::esm::store::Named;
use crate::esm::types::error::Result;
use crate::esm::types::tags::{self, Tag, rec};

/// Scenery with nothing but a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Static {
    pub meta: RecordMeta,
    pub editor_id: String,
    pub model: String,
}

impl Record for Static {
    const KIND: Tag = rec::STAT;

    fn load(reader: &mut RecordReader<'_>) -> Result<Option<Self>> {
        let mut object = Static {
            meta: reader.meta(),
            editor_id: String::new(),
            model: String::new(),
        };

        while let Some(sub) = reader.next_sub_chunk()? {
            match sub.tag {
                tags::EDID => object.editor_id = reader.read_string()?,
                tags::MODL => object.model = reader.read_string()?,
                tags::MODB | tags::MODT => reader.skip_remaining(),
                other => return Err(reader.unknown_sub_chunk(other)),
            }
        }
        Ok(Some(object))
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

record_store_item!(Static, "Static");

impl Named for Static {
    fn editor_id(&self) -> &str {
        &self.editor_id
    }
}
