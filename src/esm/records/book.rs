use super::{Record, RecordMeta, record_store_item};
use crate::esm::format::RecordReader;
use crate::esm::store::Named;
use crate::esm::types::error::Result;
use crate::esm::types::models::FormId;
use crate::esm::types::tags::{self, Tag, rec};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BookData {
    /// Bit 0x01: scroll, bit 0x02: cannot be taken
    pub flags: u8,
    /// Skill index taught when read, or -1.
    pub teaches: i8,
    pub value: u32,
    pub weight: f32,
}

impl BookData {
    pub const SCROLL: u8 = 0x01;

    pub fn is_scroll(&self) -> bool {
        self.flags & Self::SCROLL != 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub meta: RecordMeta,
    pub editor_id: String,
    pub full_name: String,
    pub model: String,
    pub icon: String,
    pub script: Option<FormId>,
    pub text: String,
    pub enchantment: Option<FormId>,
    pub enchantment_points: u16,
    pub data: BookData,
}

impl Record for Book {
    const KIND: Tag = rec::BOOK;

    fn load(reader: &mut RecordReader<'_>) -> Result<Option<Self>> {
        let mut book = Book {
            meta: reader.meta(),
            editor_id: String::new(),
            full_name: String::new(),
            model: String::new(),
            icon: String::new(),
            script: None,
            text: String::new(),
            enchantment: None,
            enchantment_points: 0,
            data: BookData::default(),
        };

        while let Some(sub) = reader.next_sub_chunk()? {
            match sub.tag {
                tags::EDID => book.editor_id = reader.read_string()?,
                tags::FULL => book.full_name = reader.read_string()?,
                tags::MODL => book.model = reader.read_string()?,
                tags::ICON => book.icon = reader.read_string()?,
                tags::SCRI => book.script = reader.read_form_id()?,
                tags::DESC => book.text = reader.read_string()?,
                tags::ENAM => book.enchantment = reader.read_form_id()?,
                tags::ANAM => book.enchantment_points = reader.read_value()?,
                tags::DATA => {
                    reader.expect_len(&[10])?;
                    book.data = BookData {
                        flags: reader.read_value()?,
                        teaches: reader.read_value()?,
                        value: reader.read_value()?,
                        weight: reader.read_value()?,
                    };
                }
                tags::MODB | tags::MODT => reader.skip_remaining(),
                other => return Err(reader.unknown_sub_chunk(other)),
            }
        }
        Ok(Some(book))
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

record_store_item!(Book, "Book");

impl Named for Book {
    fn editor_id(&self) -> &str {
        &self.editor_id
    }
}
