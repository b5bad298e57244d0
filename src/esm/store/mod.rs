//! Per-kind record stores.
//!
//! Every store has the same two-phase lifecycle: records are appended in
//! load order, then [`RecordStore::set_up`] sorts them, collapses duplicate
//! keys (the later record wins) and drops winning deletion tombstones. Only a
//! set-up store may be queried.
//!
//! # Key shapes
//!
//! - [`named`]: case-insensitive editor id
//! - [`indexed`]: fixed-capacity integer index
//! - [`sparse`]: growable integer index, per plugin for land textures
//! - [`grid`]: `(x, y)` cell coordinate
//! - [`partitioned`]: interior name or exterior coordinate

pub mod grid;
pub mod indexed;
pub mod named;
pub mod partitioned;
pub mod sparse;

use std::cmp::Ordering;

pub use grid::GridStore;
pub use indexed::IndexedStore;
pub use named::NamedStore;
pub use partitioned::PartitionedStore;
pub use sparse::{LandTextureStore, SparseStore};

use crate::esm::types::error::{LoadError, Result};
use crate::esm::types::models::FormId;

/// Anything a store can hold.
pub trait StoreItem {
    const DEBUG_NAME: &'static str;

    /// Load-order index of the file that supplied the item.
    fn source(&self) -> u8 {
        0
    }

    /// Whether the item is a tombstone that removes the key it wins.
    fn is_deleted(&self) -> bool {
        false
    }

    /// Resolved identifier, for items that come from a file.
    fn form_id(&self) -> FormId {
        FormId::default()
    }
}

/// Items keyed by a case-insensitive editor id.
pub trait Named: StoreItem {
    fn editor_id(&self) -> &str;
}

/// Items keyed by a dense integer index below `CAPACITY`.
pub trait Indexed: StoreItem {
    const CAPACITY: usize;

    fn index(&self) -> i64;
}

/// Items keyed by a sparse integer index no greater than `MAX_INDEX`.
pub trait SparseIndexed: StoreItem {
    const MAX_INDEX: usize;

    fn index(&self) -> u32;
}

/// Items keyed by an `(x, y)` grid coordinate.
pub trait Gridded: StoreItem {
    fn grid(&self) -> (i32, i32);
}

/// Items that are either interior (keyed by name) or exterior (keyed by grid).
pub trait Spatial: StoreItem {
    fn is_interior(&self) -> bool;

    fn name(&self) -> &str;

    fn grid(&self) -> (i32, i32);
}

/// Outcome of checking an item before it is staged for a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accept,
    /// The item cannot be stored and is skipped for the given reason.
    Drop(&'static str),
}

/// A key registered more than once, reported by `set_up`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub kind: &'static str,
    pub key: String,
    /// Load index of the file whose record was replaced.
    pub replaced_source: u8,
    /// Load index of the file whose record won.
    pub winner_source: u8,
}

impl Duplicate {
    fn between<T: StoreItem>(key: String, replaced: &T, winner: &T) -> Self {
        Duplicate {
            kind: T::DEBUG_NAME,
            key,
            replaced_source: replaced.source(),
            winner_source: winner.source(),
        }
    }

    /// Whether a later file replaced an earlier one's record.
    pub fn is_override(&self) -> bool {
        self.replaced_source != self.winner_source
    }

    pub fn into_error(self) -> LoadError {
        LoadError::DuplicateIdentifier {
            kind: self.kind,
            key: self.key,
        }
    }
}

/// Common interface of all stores, used by the catalogue to stage and file records.
pub trait RecordStore {
    type Item;

    /// Checks an item before its file is committed, so that a commit cannot fail.
    fn admit(item: &Self::Item) -> Result<Admission> {
        let _ = item;
        Ok(Admission::Accept)
    }

    fn append(&mut self, item: Self::Item);

    /// Builds the query indices; returns every key that was registered twice.
    fn set_up(&mut self) -> Vec<Duplicate>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Orders two strings by their ASCII-lowercased bytes.
pub(crate) fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Collapses runs of equal keys in a sorted vector, letting `replace`
/// fold each later item into the one kept for its run.
pub(crate) fn collapse_sorted<T>(
    items: Vec<T>,
    same_key: impl Fn(&T, &T) -> bool,
    mut replace: impl FnMut(&mut T, T),
) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if let Some(last) = out.last_mut()
            && same_key(last, &item)
        {
            replace(last, item);
        } else {
            out.push(item);
        }
    }
    out
}
