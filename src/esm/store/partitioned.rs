//! Store split into an interior range keyed by name and an exterior range
//! keyed by grid coordinate.

use std::ops::Range;

use super::{Duplicate, RecordStore, Spatial, cmp_ignore_case, collapse_sorted};
use crate::esm::records::Cell;
use crate::esm::types::error::{LoadError, Result};
use crate::esm::types::models::FormId;

/// One backing vector: interiors sorted by lower-cased name, then exteriors
/// sorted by `(x, y)`.
#[derive(Debug)]
pub struct PartitionedStore<T> {
    records: Vec<T>,
    interior: Range<usize>,
    exterior: Range<usize>,
    ready: bool,
}

impl<T> Default for PartitionedStore<T> {
    fn default() -> Self {
        PartitionedStore {
            records: Vec::new(),
            interior: 0..0,
            exterior: 0..0,
            ready: true,
        }
    }
}

impl<T: Spatial> PartitionedStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interiors(&self) -> &[T] {
        &self.records[self.interior.clone()]
    }

    pub fn exteriors(&self) -> &[T] {
        &self.records[self.exterior.clone()]
    }

    pub fn interior_len(&self) -> usize {
        self.interior.len()
    }

    pub fn exterior_len(&self) -> usize {
        self.exterior.len()
    }

    /// All records, interiors first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.records.iter()
    }

    pub fn search_interior(&self, name: &str) -> Option<&T> {
        debug_assert!(self.ready, "{} store queried before set_up", T::DEBUG_NAME);
        let interiors = self.interiors();
        interiors
            .binary_search_by(|record| cmp_ignore_case(record.name(), name))
            .ok()
            .map(|i| &interiors[i])
    }

    pub fn search_exterior(&self, x: i32, y: i32) -> Option<&T> {
        debug_assert!(self.ready, "{} store queried before set_up", T::DEBUG_NAME);
        let exteriors = self.exteriors();
        exteriors
            .binary_search_by_key(&(x, y), |record| record.grid())
            .ok()
            .map(|i| &exteriors[i])
    }

    pub fn find_interior(&self, name: &str) -> Result<&T> {
        self.search_interior(name).ok_or_else(|| LoadError::LookupMiss {
            kind: T::DEBUG_NAME,
            key: name.to_string(),
        })
    }

    pub fn find_exterior(&self, x: i32, y: i32) -> Result<&T> {
        self.search_exterior(x, y).ok_or_else(|| LoadError::LookupMiss {
            kind: T::DEBUG_NAME,
            key: format!("({}, {})", x, y),
        })
    }

    /// Of the exteriors named `name`, the northernmost one in the
    /// easternmost column.
    pub fn search_exterior_by_name(&self, name: &str) -> Option<&T> {
        self.exteriors()
            .iter()
            .filter(|record| record.name().eq_ignore_ascii_case(name))
            .max_by_key(|record| record.grid())
    }

    /// Interior names (lower-cased) followed by exterior coordinates.
    pub fn list_identifiers(&self) -> Vec<String> {
        let interiors = self
            .interiors()
            .iter()
            .map(|record| record.name().to_ascii_lowercase());
        let exteriors = self.exteriors().iter().map(|record| {
            let (x, y) = record.grid();
            format!("{},{}", x, y)
        });
        interiors.chain(exteriors).collect()
    }

    /// Mutable access to every record before the next `set_up`.
    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.ready = false;
        self.records.iter_mut()
    }
}

impl PartitionedStore<Cell> {
    /// Of the exteriors in `region`, the northernmost one in the easternmost
    /// column.
    pub fn search_exterior_by_region(&self, region: FormId) -> Option<&Cell> {
        self.exteriors()
            .iter()
            .filter(|cell| cell.regions.contains(&region))
            .max_by_key(|cell| cell.grid())
    }
}

impl<T: Spatial> RecordStore for PartitionedStore<T> {
    type Item = T;

    fn append(&mut self, item: T) {
        self.records.push(item);
        self.ready = false;
    }

    fn set_up(&mut self) -> Vec<Duplicate> {
        let mut duplicates = Vec::new();

        // Stable partition: relative order within each side is kept
        let (mut interiors, mut exteriors): (Vec<T>, Vec<T>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|record| record.is_interior());

        interiors.sort_by(|a, b| cmp_ignore_case(a.name(), b.name()));
        exteriors.sort_by_key(|record| record.grid());

        let mut interiors = collapse_sorted(
            interiors,
            |a, b| a.name().eq_ignore_ascii_case(b.name()),
            |kept, later| {
                duplicates.push(Duplicate::between(later.name().to_ascii_lowercase(), kept, &later));
                *kept = later;
            },
        );
        let mut exteriors = collapse_sorted(
            exteriors,
            |a, b| a.grid() == b.grid(),
            |kept, later| {
                let (x, y) = later.grid();
                duplicates.push(Duplicate::between(format!("({}, {})", x, y), kept, &later));
                *kept = later;
            },
        );
        interiors.retain(|record| !record.is_deleted());
        exteriors.retain(|record| !record.is_deleted());

        let split = interiors.len();
        interiors.append(&mut exteriors);
        self.records = interiors;
        self.interior = 0..split;
        self.exterior = split..self.records.len();
        self.ready = true;
        duplicates
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
