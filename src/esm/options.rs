//! Options controlling how strictly plugins are loaded.

use encoding_rs::{Encoding, WINDOWS_1252};

/// Load-time configuration for a [`Catalogue`](crate::Catalogue).
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Encoding of every string stored in the plugins.
    pub encoding: &'static Encoding,
    /// Fail `set_up` on the first reference to an undefined record.
    pub strict_references: bool,
    /// Fail `set_up` on the first duplicate key, including cross-file overrides.
    pub strict_uniqueness: bool,
    /// Drop records with unknown sub-chunks instead of failing the file.
    pub skip_unknown_records: bool,
    /// Make `load_all` stop at the first file that fails.
    pub stop_on_first_error: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            encoding: WINDOWS_1252,
            strict_references: false,
            strict_uniqueness: false,
            skip_unknown_records: false,
            stop_on_first_error: false,
        }
    }
}

impl LoadOptions {
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_strict_references(mut self, strict: bool) -> Self {
        self.strict_references = strict;
        self
    }

    pub fn with_strict_uniqueness(mut self, strict: bool) -> Self {
        self.strict_uniqueness = strict;
        self
    }

    pub fn with_skip_unknown_records(mut self, skip: bool) -> Self {
        self.skip_unknown_records = skip;
        self
    }

    pub fn with_stop_on_first_error(mut self, stop: bool) -> Self {
        self.stop_on_first_error = stop;
        self
    }
}

/// Resolves an encoding label such as `"windows-1252"`, `"cp1251"` or `"utf-8"`.
pub fn parse_encoding(label: &str) -> Option<&'static Encoding> {
    // Legacy code-page names used by game configuration files
    let label = match label.trim().to_ascii_lowercase().as_str() {
        "win1250" => "windows-1250",
        "win1251" => "windows-1251",
        "win1252" => "windows-1252",
        other => return Encoding::for_label(other.as_bytes()),
    };
    Encoding::for_label(label.as_bytes())
}
