use super::{Record, RecordMeta, record_store_item};
use crate::esm::format::RecordReader;
use crate::esm::store::Indexed;
use crate::esm::types::error::Result;
use crate::esm::types::tags::{self, Tag, rec};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkillData {
    pub action: i32,
    /// Governing attribute index.
    pub attribute: i32,
    /// 0 combat, 1 magic, 2 stealth
    pub specialization: u32,
    pub use_values: [f32; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub meta: RecordMeta,
    pub editor_id: String,
    pub index: i32,
    pub description: String,
    pub icon: String,
    pub data: SkillData,
    /// Texts for the apprentice, journeyman, expert and master levels.
    pub level_texts: [String; 4],
}

impl Skill {
    pub const CAPACITY: usize = 27;
}

impl Record for Skill {
    const KIND: Tag = rec::SKIL;

    fn load(reader: &mut RecordReader<'_>) -> Result<Option<Self>> {
        let mut skill = Skill {
            meta: reader.meta(),
            editor_id: String::new(),
            index: -1,
            description: String::new(),
            icon: String::new(),
            data: SkillData::default(),
            level_texts: Default::default(),
        };
        let mut seen_index = false;

        while let Some(sub) = reader.next_sub_chunk()? {
            match sub.tag {
                tags::EDID => skill.editor_id = reader.read_string()?,
                tags::INDX => {
                    skill.index = reader.read_value()?;
                    seen_index = true;
                }
                tags::DESC => skill.description = reader.read_string()?,
                tags::ICON => skill.icon = reader.read_string()?,
                tags::DATA => {
                    reader.expect_len(&[20])?;
                    skill.data = SkillData {
                        action: reader.read_value()?,
                        attribute: reader.read_value()?,
                        specialization: reader.read_value()?,
                        use_values: [reader.read_value()?, reader.read_value()?],
                    };
                }
                tags::ANAM => skill.level_texts[0] = reader.read_string()?,
                tags::JNAM => skill.level_texts[1] = reader.read_string()?,
                tags::ENAM => skill.level_texts[2] = reader.read_string()?,
                tags::MNAM => skill.level_texts[3] = reader.read_string()?,
                other => return Err(reader.unknown_sub_chunk(other)),
            }
        }

        match (seen_index, skill.meta.flags.is_deleted()) {
            (true, _) => Ok(Some(skill)),
            (false, true) => Ok(None),
            (false, false) => Err(reader.missing(tags::INDX)),
        }
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

record_store_item!(Skill, "Skill");

impl Indexed for Skill {
    const CAPACITY: usize = Skill::CAPACITY;

    fn index(&self) -> i64 {
        self.index as i64
    }
}
