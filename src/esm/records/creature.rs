use super::{Record, RecordMeta, record_store_item};
use crate::esm::format::RecordReader;
use crate::esm::store::Named;
use crate::esm::types::error::Result;
use crate::esm::types::models::FormId;
use crate::esm::types::tags::{self, Tag, rec};

/// Base actor configuration (`ACBS`), 16 bytes in older files, 24 in newer.
#[derive(Debug, Clone, PartialEq)]
pub enum ActorBase {
    Short {
        flags: u32,
        spell_points: u16,
        fatigue: u16,
        barter_gold: u16,
        level: i16,
        calc_min: u16,
        calc_max: u16,
    },
    Long {
        flags: u32,
        magicka_offset: u16,
        stamina_offset: u16,
        level: i16,
        calc_min: u16,
        calc_max: u16,
        speed_multiplier: u16,
        disposition_base: i16,
        template_flags: u16,
        health_offset: i16,
        bleedout_override: u16,
    },
}

impl ActorBase {
    fn decode(reader: &mut RecordReader<'_>) -> Result<Self> {
        match reader.expect_len(&[16, 24])? {
            16 => Ok(ActorBase::Short {
                flags: reader.read_value()?,
                spell_points: reader.read_value()?,
                fatigue: reader.read_value()?,
                barter_gold: reader.read_value()?,
                level: reader.read_value()?,
                calc_min: reader.read_value()?,
                calc_max: reader.read_value()?,
            }),
            _ => Ok(ActorBase::Long {
                flags: reader.read_value()?,
                magicka_offset: reader.read_value()?,
                stamina_offset: reader.read_value()?,
                level: reader.read_value()?,
                calc_min: reader.read_value()?,
                calc_max: reader.read_value()?,
                speed_multiplier: reader.read_value()?,
                disposition_base: reader.read_value()?,
                template_flags: reader.read_value()?,
                health_offset: reader.read_value()?,
                bleedout_override: reader.read_value()?,
            }),
        }
    }

    pub fn flags(&self) -> u32 {
        match self {
            ActorBase::Short { flags, .. } | ActorBase::Long { flags, .. } => *flags,
        }
    }

    pub fn level(&self) -> i16 {
        match self {
            ActorBase::Short { level, .. } | ActorBase::Long { level, .. } => *level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreatureData {
    pub creature_type: u8,
    pub combat_skill: u8,
    pub magic_skill: u8,
    pub stealth_skill: u8,
    pub soul: u8,
    pub health: u16,
    pub attack_damage: u16,
    /// Indexed like the attribute table.
    pub attributes: [u8; 8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryItem {
    pub item: FormId,
    pub count: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    pub meta: RecordMeta,
    pub editor_id: String,
    pub full_name: String,
    pub model: String,
    pub script: Option<FormId>,
    pub spells: Vec<FormId>,
    pub inventory: Vec<InventoryItem>,
    pub base: Option<ActorBase>,
    pub data: CreatureData,
    pub inherits_sounds_from: Option<FormId>,
}

impl Record for Creature {
    const KIND: Tag = rec::CREA;

    fn load(reader: &mut RecordReader<'_>) -> Result<Option<Self>> {
        let mut creature = Creature {
            meta: reader.meta(),
            editor_id: String::new(),
            full_name: String::new(),
            model: String::new(),
            script: None,
            spells: Vec::new(),
            inventory: Vec::new(),
            base: None,
            data: CreatureData::default(),
            inherits_sounds_from: None,
        };

        while let Some(sub) = reader.next_sub_chunk()? {
            match sub.tag {
                tags::EDID => creature.editor_id = reader.read_string()?,
                tags::FULL => creature.full_name = reader.read_string()?,
                tags::MODL => creature.model = reader.read_string()?,
                tags::SCRI => creature.script = reader.read_form_id()?,
                tags::SPLO => creature.spells.extend(reader.read_form_id()?),
                tags::CNTO => {
                    reader.expect_len(&[8])?;
                    let item = reader.read_form_id()?;
                    let count = reader.read_value()?;
                    if let Some(item) = item {
                        creature.inventory.push(InventoryItem { item, count });
                    }
                }
                tags::ACBS => creature.base = Some(ActorBase::decode(reader)?),
                tags::DATA => {
                    reader.expect_len(&[18])?;
                    let mut data = CreatureData {
                        creature_type: reader.read_value()?,
                        combat_skill: reader.read_value()?,
                        magic_skill: reader.read_value()?,
                        stealth_skill: reader.read_value()?,
                        soul: reader.read_value()?,
                        ..CreatureData::default()
                    };
                    reader.read_bytes(1)?;
                    data.health = reader.read_value()?;
                    data.attack_damage = reader.read_value()?;
                    data.attributes.copy_from_slice(reader.read_bytes(8)?);
                    creature.data = data;
                }
                tags::CSCR => creature.inherits_sounds_from = reader.read_form_id()?,
                tags::MODB
                | tags::MODT
                | tags::NIFZ
                | tags::NIFT
                | tags::AIDT
                | tags::PKID
                | tags::KFFZ
                | tags::RNAM
                | tags::ZNAM
                | tags::TNAM
                | tags::BNAM
                | tags::WNAM
                | tags::CSDT
                | tags::CSDI
                | tags::CSDC => reader.skip_remaining(),
                other => return Err(reader.unknown_sub_chunk(other)),
            }
        }
        Ok(Some(creature))
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

record_store_item!(Creature, "Creature");

impl Named for Creature {
    fn editor_id(&self) -> &str {
        &self.editor_id
    }
}
