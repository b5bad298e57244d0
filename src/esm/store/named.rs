//! Store keyed by case-insensitive editor id.

use log::trace;

use super::{Admission, Duplicate, Named, RecordStore, cmp_ignore_case, collapse_sorted};
use crate::esm::types::error::{LoadError, Result};

#[derive(Debug)]
struct Entry<T> {
    /// Lower-cased editor id.
    key: String,
    /// Append position of the first definition of this key.
    first_seen: usize,
    record: T,
}

/// Sorted, name-keyed store.
///
/// Keys are lower-cased for indexing; records keep the original case of
/// their editor id for display.
#[derive(Debug)]
pub struct NamedStore<T> {
    entries: Vec<Entry<T>>,
    load_order: Vec<usize>,
    appended: usize,
    ready: bool,
}

impl<T> Default for NamedStore<T> {
    fn default() -> Self {
        NamedStore {
            entries: Vec::new(),
            load_order: Vec::new(),
            appended: 0,
            ready: true,
        }
    }
}

impl<T: Named> NamedStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    fn position(&self, id: &str) -> Option<usize> {
        debug_assert!(self.ready, "{} store queried before set_up", T::DEBUG_NAME);
        self.entries
            .binary_search_by(|entry| cmp_ignore_case(&entry.key, id))
            .ok()
    }

    pub fn search(&self, id: &str) -> Option<&T> {
        self.position(id).map(|i| &self.entries[i].record)
    }

    pub fn find(&self, id: &str) -> Result<&T> {
        self.search(id).ok_or_else(|| LoadError::LookupMiss {
            kind: T::DEBUG_NAME,
            key: id.to_string(),
        })
    }

    /// Record at `index` in key order.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|entry| &entry.record)
    }

    /// All keys in sorted order.
    pub fn list_identifiers(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Records in key order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|entry| &entry.record)
    }

    /// Records in the order their keys were first defined.
    pub fn iter_load_order(&self) -> impl Iterator<Item = &T> + '_ {
        self.load_order.iter().map(|&i| &self.entries[i].record)
    }

    /// Records whose editor id starts with `prefix`, ignoring case.
    pub fn search_prefix<'s>(&'s self, prefix: &'s str) -> impl Iterator<Item = &'s T> + 's {
        debug_assert!(self.ready, "{} store queried before set_up", T::DEBUG_NAME);
        let start = self
            .entries
            .partition_point(|entry| cmp_ignore_case(&entry.key, prefix).is_lt());
        self.entries[start..]
            .iter()
            .take_while(move |entry| {
                entry.key.len() >= prefix.len()
                    && entry.key.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
            })
            .map(|entry| &entry.record)
    }
}

impl<T: Named> RecordStore for NamedStore<T> {
    type Item = T;

    fn admit(item: &T) -> Result<Admission> {
        if !item.editor_id().is_empty() {
            Ok(Admission::Accept)
        } else if item.is_deleted() {
            Ok(Admission::Drop("deleted record without editor id"))
        } else {
            Err(LoadError::MissingEditorId {
                kind: T::DEBUG_NAME,
                form_id: item.form_id(),
            })
        }
    }

    fn append(&mut self, record: T) {
        let key = record.editor_id().to_ascii_lowercase();
        trace!("Appending {} '{}'", T::DEBUG_NAME, key);
        self.entries.push(Entry {
            key,
            first_seen: self.appended,
            record,
        });
        self.appended += 1;
        self.ready = false;
    }

    fn set_up(&mut self) -> Vec<Duplicate> {
        let mut duplicates = Vec::new();

        let mut entries = std::mem::take(&mut self.entries);
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        let mut entries = collapse_sorted(
            entries,
            |a, b| a.key == b.key,
            |kept, later| {
                duplicates.push(Duplicate::between(kept.key.clone(), &kept.record, &later.record));
                kept.record = later.record;
            },
        );
        entries.retain(|entry| !entry.record.is_deleted());

        let mut load_order: Vec<usize> = (0..entries.len()).collect();
        load_order.sort_by_key(|&i| entries[i].first_seen);

        self.entries = entries;
        self.load_order = load_order;
        self.ready = true;
        duplicates
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
