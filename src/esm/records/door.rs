use super::{Record, RecordMeta, record_store_item};
use crate::esm::format::RecordReader;
use crate::esm::store::Named;
use crate::esm::types::error::Result;
use crate::esm::types::models::FormId;
use crate::esm::types::tags::{self, Tag, rec};

/// Door stat block. Older files store 10 bytes, newer ones 16.
#[derive(Debug, Clone, PartialEq)]
pub enum DoorData {
    Short {
        flags: u8,
        door_type: u8,
        teaches: i8,
        value: u32,
        lock_level: u16,
    },
    Long {
        flags: u8,
        door_type: u8,
        teaches: i8,
        value: u32,
        lock_level: u16,
        extended_flags: u32,
    },
}

impl DoorData {
    fn decode(reader: &mut RecordReader<'_>) -> Result<Self> {
        let len = reader.expect_len(&[10, 16])?;
        let flags = reader.read_value()?;
        let door_type = reader.read_value()?;
        let teaches = reader.read_value()?;
        reader.read_bytes(1)?;
        let value = reader.read_value()?;
        let lock_level = reader.read_value()?;
        if len == 10 {
            return Ok(DoorData::Short {
                flags,
                door_type,
                teaches,
                value,
                lock_level,
            });
        }
        reader.read_bytes(2)?;
        Ok(DoorData::Long {
            flags,
            door_type,
            teaches,
            value,
            lock_level,
            extended_flags: reader.read_value()?,
        })
    }

    pub fn flags(&self) -> u8 {
        match self {
            DoorData::Short { flags, .. } | DoorData::Long { flags, .. } => *flags,
        }
    }

    pub fn door_type(&self) -> u8 {
        match self {
            DoorData::Short { door_type, .. } | DoorData::Long { door_type, .. } => *door_type,
        }
    }

    /// Skill index taught on first use, or -1.
    pub fn teaches(&self) -> i8 {
        match self {
            DoorData::Short { teaches, .. } | DoorData::Long { teaches, .. } => *teaches,
        }
    }

    pub fn value(&self) -> u32 {
        match self {
            DoorData::Short { value, .. } | DoorData::Long { value, .. } => *value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub meta: RecordMeta,
    pub editor_id: String,
    pub full_name: String,
    pub model: String,
    pub script: Option<FormId>,
    pub open_sound: Option<FormId>,
    pub close_sound: Option<FormId>,
    pub loop_sound: Option<FormId>,
    pub data: Option<DoorData>,
    pub door_flags: u8,
}

impl Record for Door {
    const KIND: Tag = rec::DOOR;

    fn load(reader: &mut RecordReader<'_>) -> Result<Option<Self>> {
        let mut door = Door {
            meta: reader.meta(),
            editor_id: String::new(),
            full_name: String::new(),
            model: String::new(),
            script: None,
            open_sound: None,
            close_sound: None,
            loop_sound: None,
            data: None,
            door_flags: 0,
        };

        while let Some(sub) = reader.next_sub_chunk()? {
            match sub.tag {
                tags::EDID => door.editor_id = reader.read_string()?,
                tags::FULL => door.full_name = reader.read_string()?,
                tags::MODL => door.model = reader.read_string()?,
                tags::SCRI => door.script = reader.read_form_id()?,
                tags::SNAM => door.open_sound = reader.read_form_id()?,
                tags::ANAM => door.close_sound = reader.read_form_id()?,
                tags::BNAM => door.loop_sound = reader.read_form_id()?,
                tags::DATA => door.data = Some(DoorData::decode(reader)?),
                tags::FNAM => door.door_flags = reader.read_value()?,
                tags::MODB | tags::MODT => reader.skip_remaining(),
                other => return Err(reader.unknown_sub_chunk(other)),
            }
        }
        Ok(Some(door))
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

record_store_item!(Door, "Door");

impl Named for Door {
    fn editor_id(&self) -> &str {
        &self.editor_id
    }
}
