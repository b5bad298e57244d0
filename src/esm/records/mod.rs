//! Typed record kinds and their sub-chunk loaders.
//!
//! Each loader walks its record's sub-chunks and matches on the tag: needed
//! tags are decoded, recognised-but-unused tags are skipped explicitly and any
//! other tag fails the record with `UnknownSubChunk`.

/// Implements `StoreItem` for a record kind from its `meta` field.
macro_rules! record_store_item {
    ($ty:ty, $name:literal) => {
        impl $crate::esm::store::StoreItem for $ty {
            const DEBUG_NAME: &'static str = $name;

            fn source(&self) -> u8 {
                self.meta.source
            }

            fn is_deleted(&self) -> bool {
                self.meta.flags.is_deleted()
            }

            fn form_id(&self) -> $crate::esm::types::models::FormId {
                self.meta.form_id
            }
        }
    };
}

pub(crate) use record_store_item;

mod attribute;
mod book;
mod cell;
mod creature;
mod door;
mod land;
mod land_texture;
mod magic_effect;
mod pathgrid;
mod script;
mod skill;
mod sound;
mod static_object;

pub use attribute::Attribute;
pub use book::{Book, BookData};
pub use cell::{Cell, CellGrid};
pub use creature::{ActorBase, Creature, CreatureData, InventoryItem};
pub use door::{Door, DoorData};
pub use land::{Land, LandHeights};
pub use land_texture::LandTexture;
pub use magic_effect::{MagicEffect, MagicEffectData};
pub use pathgrid::{Pathgrid, PathgridEdge, PathgridPoint};
pub use script::{Script, ScriptHeader};
pub use sound::{Sound, SoundData};
pub use skill::{Skill, SkillData};
pub use static_object::Static;

use crate::esm::format::RecordReader;
use crate::esm::types::error::Result;
use crate::esm::types::models::{FormId, RecordFlags};
use crate::esm::types::tags::Tag;

/// Identity and provenance shared by all loaded records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordMeta {
    pub form_id: FormId,
    pub flags: RecordFlags,
    /// Load-order index of the file the record came from.
    pub source: u8,
}

/// A record kind that can be loaded from a plugin.
pub trait Record: Sized {
    /// Record kind tag as found in the record header.
    const KIND: Tag;

    /// Reads the record from its sub-chunks.
    ///
    /// `None` for a deletion tombstone that lacks the sub-chunk its store is
    /// keyed by; it names nothing to remove.
    fn load(reader: &mut RecordReader<'_>) -> Result<Option<Self>>;

    fn meta(&self) -> &RecordMeta;
}
