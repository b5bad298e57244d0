use super::{Record, RecordMeta, record_store_item};
use crate::esm::format::RecordReader;
use crate::esm::store::Named;
use crate::esm::types::error::Result;
use crate::esm::types::tags::{self, Tag, rec};

/// Sound playback parameters: 8 bytes (`SNDD`) or 12 bytes (`SNDX`).
#[derive(Debug, Clone, PartialEq)]
pub enum SoundData {
    Short {
        min_attenuation: u8,
        max_attenuation: u8,
        frequency_adjustment: i8,
        flags: u32,
    },
    Long {
        min_attenuation: u8,
        max_attenuation: u8,
        frequency_adjustment: i8,
        flags: u32,
        static_attenuation: u16,
        stop_time: u8,
        start_time: u8,
    },
}

impl SoundData {
    fn decode(reader: &mut RecordReader<'_>) -> Result<Self> {
        let len = reader.expect_len(&[8, 12])?;
        let min_attenuation = reader.read_value()?;
        let max_attenuation = reader.read_value()?;
        let frequency_adjustment = reader.read_value()?;
        reader.read_bytes(1)?;
        let flags = reader.read_value()?;
        if len == 8 {
            return Ok(SoundData::Short {
                min_attenuation,
                max_attenuation,
                frequency_adjustment,
                flags,
            });
        }
        Ok(SoundData::Long {
            min_attenuation,
            max_attenuation,
            frequency_adjustment,
            flags,
            static_attenuation: reader.read_value()?,
            stop_time: reader.read_value()?,
            start_time: reader.read_value()?,
        })
    }

    pub fn flags(&self) -> u32 {
        match self {
            SoundData::Short { flags, .. } | SoundData::Long { flags, .. } => *flags,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    pub meta: RecordMeta,
    pub editor_id: String,
    pub file: String,
    pub data: Option<SoundData>,
}

impl Record for Sound {
    const KIND: Tag = rec::SOUN;

    fn load(reader: &mut RecordReader<'_>) -> Result<Option<Self>> {
        let mut sound = Sound {
            meta: reader.meta(),
            editor_id: String::new(),
            file: String::new(),
            data: None,
        };

        while let Some(sub) = reader.next_sub_chunk()? {
            match sub.tag {
                tags::EDID => sound.editor_id = reader.read_string()?,
                tags::FNAM => sound.file = reader.read_string()?,
                tags::SNDD | tags::SNDX => sound.data = Some(SoundData::decode(reader)?),
                other => return Err(reader.unknown_sub_chunk(other)),
            }
        }
        Ok(Some(sound))
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

record_store_item!(Sound, "Sound");

impl Named for Sound {
    fn editor_id(&self) -> &str {
        &self.editor_id
    }
}
