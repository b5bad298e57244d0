//! # esm-catalogue
//!
//! A reader for TES4-style content plugins (`.esm` / `.esp`) and an in-memory
//! catalogue of the records they define.
//!
//! Files are loaded in load order with [`Catalogue::load`], the catalogue is
//! indexed once with [`Catalogue::set_up`], and the per-kind stores are then
//! queried by editor id, index, grid coordinate or interior/exterior key.
pub mod esm;

// Re-export the main types for convenience
pub use esm::{
    Catalogue, LoadReport, StoredIn,
    options::{LoadOptions, parse_encoding},
    types::{
        error::{LoadError, Result},
        models::{FileHeader, FormId, HeaderVariant, MasterFile, RecordFlags},
        tags::{Tag, TagRole},
    },
};
