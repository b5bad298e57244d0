//! Fixed-capacity store keyed by a dense integer index.

use super::{Admission, Duplicate, Indexed, RecordStore};
use crate::esm::types::error::{LoadError, Result};

/// Slot `i` holds the record with index `i`.
#[derive(Debug)]
pub struct IndexedStore<T> {
    slots: Vec<Option<T>>,
    pending: Vec<Duplicate>,
}

impl<T: Indexed> Default for IndexedStore<T> {
    fn default() -> Self {
        IndexedStore {
            slots: (0..T::CAPACITY).map(|_| None).collect(),
            pending: Vec::new(),
        }
    }
}

impl<T: Indexed> IndexedStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(&self) -> usize {
        T::CAPACITY
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

    /// Present records in index order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn list_identifiers(&self) -> Vec<String> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| i.to_string())
            .collect()
    }

    fn slot_of(item: &T) -> Result<usize> {
        let index = item.index();
        if index < 0 || index as usize >= T::CAPACITY {
            return Err(LoadError::IndexOutOfRange {
                kind: T::DEBUG_NAME,
                index,
                limit: T::CAPACITY,
            });
        }
        Ok(index as usize)
    }
}

impl<T: Indexed> RecordStore for IndexedStore<T> {
    type Item = T;

    fn admit(item: &T) -> Result<Admission> {
        Self::slot_of(item).map(|_| Admission::Accept)
    }

    fn append(&mut self, item: T) {
        // Out-of-range items never get past `admit`
        let Ok(slot) = Self::slot_of(&item) else {
            return;
        };
        if let Some(previous) = &self.slots[slot] {
            self.pending
                .push(Duplicate::between(slot.to_string(), previous, &item));
        }
        self.slots[slot] = Some(item);
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
