//! Core modules for reading plugin files and cataloguing their records.

pub mod catalogue;
pub mod codec;
pub mod format;
pub mod options;
pub mod records;
pub mod resolver;
pub mod store;
pub mod types;

pub use catalogue::{Catalogue, LoadReport, StoredIn};
