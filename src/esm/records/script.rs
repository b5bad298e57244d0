use super::{Record, RecordMeta, record_store_item};
use crate::esm::format::RecordReader;
use crate::esm::store::Named;
use crate::esm::types::error::Result;
use crate::esm::types::models::FormId;
use crate::esm::types::tags::{self, Tag, rec};

/// `SCHR` summary of the compiled script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptHeader {
    pub reference_count: u32,
    pub compiled_size: u32,
    pub variable_count: u32,
    /// 0 object, 1 quest, 0x100 magic effect
    pub script_type: u16,
    pub flags: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub meta: RecordMeta,
    pub editor_id: String,
    pub header: ScriptHeader,
    pub source: String,
    /// Objects the compiled script refers to, in reference-slot order.
    pub references: Vec<FormId>,
}

impl Record for Script {
    const KIND: Tag = rec::SCPT;

    fn load(reader: &mut RecordReader<'_>) -> Result<Option<Self>> {
        let mut script = Script {
            meta: reader.meta(),
            editor_id: String::new(),
            header: ScriptHeader::default(),
            source: String::new(),
            references: Vec::new(),
        };

        while let Some(sub) = reader.next_sub_chunk()? {
            match sub.tag {
                tags::EDID => script.editor_id = reader.read_string()?,
                tags::SCHR => {
                    reader.expect_len(&[20])?;
                    reader.read_bytes(4)?;
                    script.header = ScriptHeader {
                        reference_count: reader.read_value()?,
                        compiled_size: reader.read_value()?,
                        variable_count: reader.read_value()?,
                        script_type: reader.read_value()?,
                        flags: reader.read_value()?,
                    };
                }
                tags::SCTX => script.source = reader.read_string()?,
                tags::SCRO => script.references.extend(reader.read_form_id()?),
                tags::SCDA | tags::SLSD | tags::SCVR | tags::SCRV => reader.skip_remaining(),
                other => return Err(reader.unknown_sub_chunk(other)),
            }
        }
        Ok(Some(script))
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

record_store_item!(Script, "Script");

impl Named for Script {
    fn editor_id(&self) -> &str {
        &self.editor_id
    }
}
