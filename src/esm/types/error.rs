//! Error types for loading and querying the catalogue.

use thiserror::Error;

use super::models::FormId;
use super::tags::Tag;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum LoadError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the expected header record.
    #[error("Invalid file magic: expected {expected}, found {found}")]
    InvalidMagic { expected: Tag, found: Tag },

    /// A read ran past the end of the current sub-chunk.
    #[error("Truncated {kind} record in {tag} sub-chunk: need {need} bytes, have {have}")]
    TruncatedRecord {
        kind: Tag,
        tag: Tag,
        need: usize,
        have: usize,
    },

    /// A record carries a sub-chunk its loader does not recognise.
    #[error("Unknown sub-chunk {tag} in {kind} record")]
    UnknownSubChunk { tag: Tag, kind: Tag },

    /// Record or group framing does not add up.
    #[error("Corrupt framing at offset {offset:#x}: {reason}")]
    CorruptFraming { offset: usize, reason: &'static str },

    /// A versioned block has a length none of its layouts use.
    #[error("Unexpected length {found} for {tag} in {kind} record")]
    UnexpectedLength { kind: Tag, tag: Tag, found: usize },

    /// A sub-chunk the record cannot be built without is absent.
    #[error("{kind} record is missing its {tag} sub-chunk")]
    MissingSubChunk { kind: Tag, tag: Tag },

    /// A record bound for a name-keyed store has no editor id.
    #[error("{kind} record {form_id} has no editor id")]
    MissingEditorId { kind: &'static str, form_id: FormId },

    /// An index-keyed record falls outside its store.
    #[error("{kind} index {index} out of range (limit {limit})")]
    IndexOutOfRange {
        kind: &'static str,
        index: i64,
        limit: usize,
    },

    /// A cross-reference names a record no loaded file defines.
    #[error("Dangling reference from {from} ({kind}) to {target}")]
    DanglingReference {
        from: FormId,
        kind: Tag,
        target: FormId,
    },

    /// Two records of one kind share a key.
    #[error("Duplicate {kind} identifier '{key}'")]
    DuplicateIdentifier { kind: &'static str, key: String },

    /// A `find` found nothing under the key.
    #[error("{kind} '{key}' not found")]
    LookupMiss { kind: &'static str, key: String },

    /// A plugin names a master that is not loaded before it.
    #[error("Master '{master}' required by '{file}' is not loaded")]
    MissingMaster { file: String, master: String },

    /// A file with the same name is already part of the load order.
    #[error("File '{file}' is already loaded")]
    DuplicateFile { file: String },

    /// The load order has no room for another file index.
    #[error("Too many content files (limit {limit})")]
    TooManyFiles { limit: usize },

    /// An error occurred while inflating a compressed record.
    #[error("Decompression failed: {0}")]
    Decompression(String),

    /// A buffer has an unexpected size after an operation.
    #[error("Size mismatch for {context}: expected {expected} bytes, but found {found} bytes")]
    SizeMismatch {
        context: &'static str,
        expected: u64,
        found: u64,
    },

    /// Wraps an error with the name of the file it came from.
    #[error("{file}: {source}")]
    InFile {
        file: String,
        #[source]
        source: Box<LoadError>,
    },
}

impl LoadError {
    /// Attaches a file name, unless one is attached already.
    pub fn in_file(self, file: &str) -> Self {
        match self {
            LoadError::InFile { .. } => self,
            other => LoadError::InFile {
                file: file.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The error with any file context stripped.
    pub fn root(&self) -> &LoadError {
        match self {
            LoadError::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

/// A convenience `Result` type alias using the crate's `LoadError` type.
pub type Result<T> = std::result::Result<T, LoadError>;
