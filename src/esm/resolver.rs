//! Load-order based resolution of file-local identifiers.
//!
//! A file-local [`FormId`] carries a master index in its top byte. Indices
//! inside the file's master list point at that master's load-order slot;
//! anything else means the file itself. The low 24 bits pass through, so an
//! object keeps the identity of the file that first defined it and every
//! later plugin that edits it resolves to the same global id.

use std::collections::HashSet;

use log::debug;

use crate::esm::types::error::{LoadError, Result};
use crate::esm::types::models::{FormId, MasterFile};
use crate::esm::types::tags::Tag;

/// Highest number of files a load order can hold.
pub const MAX_FILES: usize = 255;

/// Resolution context for one file: its own slot and its masters' slots.
#[derive(Debug, Clone)]
pub struct FileContext {
    name: String,
    load_index: u8,
    masters: Vec<u8>,
}

impl FileContext {
    /// A context for standalone reads where every id belongs to `load_index`.
    pub fn standalone(name: &str, load_index: u8) -> Self {
        FileContext {
            name: name.to_string(),
            load_index,
            masters: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn load_index(&self) -> u8 {
        self.load_index
    }

    /// Load-order slots of this file's masters, in master-list order.
    pub fn masters(&self) -> &[u8] {
        &self.masters
    }

    pub fn resolve(&self, local: u32) -> FormId {
        let master_index = (local >> 24) as usize;
        let file = self
            .masters
            .get(master_index)
            .copied()
            .unwrap_or(self.load_index);
        FormId::new(file, local)
    }
}

/// A cross-reference found while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub from: FormId,
    pub kind: Tag,
    pub target: FormId,
}

/// Load-order table plus the defined/referenced id sets of committed files.
#[derive(Debug, Default)]
pub struct Resolver {
    files: Vec<FileContext>,
    defined: HashSet<FormId>,
    references: Vec<Reference>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.files
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Prepares the context for the next file in load order.
    ///
    /// Nothing is recorded until [`commit`](Self::commit) is called.
    pub fn begin_file(&self, name: &str, masters: &[MasterFile]) -> Result<FileContext> {
        if self.files.len() >= MAX_FILES {
            return Err(LoadError::TooManyFiles { limit: MAX_FILES });
        }
        if self.position(name).is_some() {
            return Err(LoadError::DuplicateFile {
                file: name.to_string(),
            });
        }

        let masters = masters
            .iter()
            .map(|master| {
                self.position(&master.name)
                    .map(|index| index as u8)
                    .ok_or_else(|| LoadError::MissingMaster {
                        file: name.to_string(),
                        master: master.name.clone(),
                    })
            })
            .collect::<Result<Vec<u8>>>()?;

        let context = FileContext {
            name: name.to_string(),
            load_index: self.files.len() as u8,
            masters,
        };
        debug!(
            "Resolving {} as load index {} with masters {:?}",
            name, context.load_index, context.masters
        );
        Ok(context)
    }

    /// Records a fully parsed file's defined ids and outgoing references.
    pub fn commit(
        &mut self,
        context: FileContext,
        defined: impl IntoIterator<Item = FormId>,
        references: impl IntoIterator<Item = Reference>,
    ) {
        self.defined.extend(defined);
        self.references.extend(references);
        self.files.push(context);
    }

    /// Resolves `local` as read from the file at `file_index`.
    pub fn resolve(&self, file_index: usize, local: u32) -> Option<FormId> {
        self.files.get(file_index).map(|f| f.resolve(local))
    }

    pub fn context(&self, file_index: usize) -> Option<&FileContext> {
        self.files.get(file_index)
    }

    pub fn is_defined(&self, id: FormId) -> bool {
        self.defined.contains(&id)
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// References whose target no committed file defines.
    pub fn dangling(&self) -> impl Iterator<Item = &Reference> + '_ {
        self.references
            .iter()
            .filter(|r| !self.defined.contains(&r.target))
    }
}
