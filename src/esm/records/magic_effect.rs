use super::{Record, RecordMeta, record_store_item};
use crate::esm::format::RecordReader;
use crate::esm::store::Indexed;
use crate::esm::types::error::Result;
use crate::esm::types::models::FormId;
use crate::esm::types::tags::{self, Tag, rec};

/// Leading 36 bytes of `DATA`; later versions append fields after them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MagicEffectData {
    pub flags: u32,
    pub base_cost: f32,
    pub associated_item: Option<FormId>,
    pub school: i32,
    pub resist_value: i32,
    pub counter_effect_count: u16,
    pub light: Option<FormId>,
    pub projectile_speed: f32,
    pub effect_shader: Option<FormId>,
}

impl MagicEffectData {
    const DECODED_LEN: usize = 36;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MagicEffect {
    pub meta: RecordMeta,
    /// Four-character effect code.
    pub editor_id: String,
    pub index: i32,
    pub full_name: String,
    pub description: String,
    pub icon: String,
    pub model: String,
    pub data: MagicEffectData,
}

impl MagicEffect {
    pub const CAPACITY: usize = 143;
}

impl Record for MagicEffect {
    const KIND: Tag = rec::MGEF;

    fn load(reader: &mut RecordReader<'_>) -> Result<Option<Self>> {
        let mut effect = MagicEffect {
            meta: reader.meta(),
            editor_id: String::new(),
            index: -1,
            full_name: String::new(),
            description: String::new(),
            icon: String::new(),
            model: String::new(),
            data: MagicEffectData::default(),
        };
        let mut seen_index = false;

        while let Some(sub) = reader.next_sub_chunk()? {
            match sub.tag {
                tags::EDID => effect.editor_id = reader.read_string()?,
                tags::INDX => {
                    effect.index = reader.read_value()?;
                    seen_index = true;
                }
                tags::FULL => effect.full_name = reader.read_string()?,
                tags::DESC => effect.description = reader.read_string()?,
                tags::ICON => effect.icon = reader.read_string()?,
                tags::MODL => effect.model = reader.read_string()?,
                tags::DATA => {
                    if sub.len < MagicEffectData::DECODED_LEN {
                        return Err(reader.unexpected_length(sub.len));
                    }
                    let mut data = MagicEffectData {
                        flags: reader.read_value()?,
                        base_cost: reader.read_value()?,
                        associated_item: reader.read_form_id()?,
                        school: reader.read_value()?,
                        resist_value: reader.read_value()?,
                        counter_effect_count: reader.read_value()?,
                        ..MagicEffectData::default()
                    };
                    reader.read_bytes(2)?;
                    data.light = reader.read_form_id()?;
                    data.projectile_speed = reader.read_value()?;
                    data.effect_shader = reader.read_form_id()?;
                    reader.skip_remaining();
                    effect.data = data;
                }
                tags::MODB | tags::ESCE => reader.skip_remaining(),
                other => return Err(reader.unknown_sub_chunk(other)),
            }
        }

        match (seen_index, effect.meta.flags.is_deleted()) {
            (true, _) => Ok(Some(effect)),
            (false, true) => Ok(None),
            (false, false) => Err(reader.missing(tags::INDX)),
        }
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

record_store_item!(MagicEffect, "MagicEffect");

impl Indexed for MagicEffect {
    const CAPACITY: usize = MagicEffect::CAPACITY;

    fn index(&self) -> i64 {
        self.index as i64
    }
}
