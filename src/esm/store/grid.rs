//! Store keyed by `(x, y)` grid coordinate.

use super::{Duplicate, Gridded, RecordStore, collapse_sorted};
use crate::esm::types::error::{LoadError, Result};

/// Records sorted lexicographically by `(x, y)`.
#[derive(Debug)]
pub struct GridStore<T> {
    records: Vec<T>,
    ready: bool,
}

impl<T> Default for GridStore<T> {
    fn default() -> Self {
        GridStore {
            records: Vec::new(),
            ready: true,
        }
    }
}

impl<T: Gridded> GridStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self, x: i32, y: i32) -> Option<&T> {
        debug_assert!(self.ready, "{} store queried before set_up", T::DEBUG_NAME);
        self.records
            .binary_search_by_key(&(x, y), |record| record.grid())
            .ok()
            .map(|i| &self.records[i])
    }

    pub fn find(&self, x: i32, y: i32) -> Result<&T> {
        self.search(x, y).ok_or_else(|| LoadError::LookupMiss {
            kind: T::DEBUG_NAME,
            key: format!("({}, {})", x, y),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.records.iter()
    }

    pub fn list_identifiers(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| {
                let (x, y) = record.grid();
                format!("{},{}", x, y)
            })
            .collect()
    }
}

impl<T: Gridded> RecordStore for GridStore<T> {
    type Item = T;

    fn append(&mut self, item: T) {
        self.records.push(item);
        self.ready = false;
    }

    fn set_up(&mut self) -> Vec<Duplicate> {
        let mut duplicates = Vec::new();
        let mut records = std::mem::take(&mut self.records);
        records.sort_by_key(|record| record.grid());
        let mut records = collapse_sorted(
            records,
            |a, b| a.grid() == b.grid(),
            |kept, later| {
                let (x, y) = later.grid();
                duplicates.push(Duplicate::between(format!("({}, {})", x, y), kept, &later));
                *kept = later;
            },
        );
        records.retain(|record| !record.is_deleted());
        self.records = records;
        self.ready = true;
        duplicates
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
