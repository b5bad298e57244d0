//! Growable integer-indexed stores.

use log::debug;

use super::{Admission, Duplicate, RecordStore, SparseIndexed, StoreItem};
use crate::esm::records::LandTexture;
use crate::esm::types::error::{LoadError, Result};

/// Slots are assigned directly by index and grow on demand.
#[derive(Debug)]
pub struct SparseStore<T> {
    slots: Vec<Option<T>>,
    pending: Vec<Duplicate>,
}

impl<T> Default for SparseStore<T> {
    fn default() -> Self {
        SparseStore {
            slots: Vec::new(),
            pending: Vec::new(),
        }
    }
}

impl<T: SparseIndexed> SparseStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn find(&self, index: usize) -> Result<&T> {
        self.search(index).ok_or_else(|| LoadError::LookupMiss {
            kind: T::DEBUG_NAME,
            key: index.to_string(),
        })
    }

    pub(crate) fn search_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Present records in index order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// One past the highest assigned index.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl<T: SparseIndexed> RecordStore for SparseStore<T> {
    type Item = T;

    fn admit(item: &T) -> Result<Admission> {
        let index = item.index() as usize;
        if index > T::MAX_INDEX {
            return Err(LoadError::IndexOutOfRange {
                kind: T::DEBUG_NAME,
                index: index as i64,
                limit: T::MAX_INDEX + 1,
            });
        }
        Ok(Admission::Accept)
    }

    fn append(&mut self, item: T) {
        let index = item.index() as usize;
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        if let Some(previous) = &self.slots[index] {
            self.pending
                .push(Duplicate::between(index.to_string(), previous, &item));
        }
        self.slots[index] = Some(item);
    }

    fn set_up(&mut self) -> Vec<Duplicate> {
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|item| item.is_deleted()) {
                *slot = None;
            }
        }
        std::mem::take(&mut self.pending)
    }

    fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Land textures, one sparse list per plugin.
///
/// Texture indices are local to the plugin that defines them, so lookups
/// take both the index and the plugin's load index.
#[derive(Debug, Default)]
pub struct LandTextureStore {
    plugins: Vec<SparseStore<LandTexture>>,
}

impl LandTextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self, index: usize, plugin: usize) -> Option<&LandTexture> {
        self.plugins.get(plugin)?.search(index)
    }

    pub fn find(&self, index: usize, plugin: usize) -> Result<&LandTexture> {
        self.search(index, plugin).ok_or_else(|| LoadError::LookupMiss {
            kind: LandTexture::DEBUG_NAME,
            key: format!("{} in plugin {}", index, plugin),
        })
    }

    /// Sparse list of one plugin, if it defined any land textures.
    pub fn plugin(&self, plugin: usize) -> Option<&SparseStore<LandTexture>> {
        self.plugins.get(plugin)
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LandTexture> + '_ {
        self.plugins.iter().flat_map(|plugin| plugin.iter())
    }
}

impl RecordStore for LandTextureStore {
    type Item = LandTexture;

    fn admit(item: &LandTexture) -> Result<Admission> {
        SparseStore::<LandTexture>::admit(item)
    }

    fn append(&mut self, item: LandTexture) {
        let plugin = item.source() as usize;
        if plugin >= self.plugins.len() {
            self.plugins.resize_with(plugin + 1, SparseStore::new);
        }

        // A same-named texture in an earlier plugin takes over the new path
        let index = item.index as usize;
        for earlier in &mut self.plugins[..plugin] {
            if let Some(texture) = earlier.search_mut(index)
                && texture.editor_id.eq_ignore_ascii_case(&item.editor_id)
            {
                debug!(
                    "Land texture '{}' path overridden by plugin {}",
                    item.editor_id, plugin
                );
                texture.texture = item.texture.clone();
            }
        }

        self.plugins[plugin].append(item);
    }

    fn set_up(&mut self) -> Vec<Duplicate> {
        self.plugins
            .iter_mut()
            .flat_map(|plugin| plugin.set_up())
            .collect()
    }

    fn len(&self) -> usize {
        self.plugins.iter().map(|plugin| plugin.len()).sum()
    }
}
