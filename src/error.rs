use std::io;
use thiserror::Error;

use crate::tar::EntryType;

/// Result type for tar encoding operations
pub type Result<T> = std::result::Result<T, TarError>;

/// Unified error type for all tar encoding operations
///
/// Header/field failures are detected while packing, before any bytes for the
/// offending entry are emitted, and abort the whole archive. The `field` in
/// the encoding variants is `"<entry-name>:<field-name>"`.
#[derive(Debug, Error)]
pub enum TarError {
    // Field encoding errors
    #[error("Value must be ascii for {field} [{value}]")]
    NonAsciiValue { field: String, value: String },

    #[error("Value too long for {field} [{len} >= {max}]")]
    FieldTooLong { field: String, len: usize, max: usize },

    #[error("Value out of range for {field} [{value}]")]
    ValueOutOfRange { field: String, value: i128 },

    #[error("Invalid file mode for {field} [{mode}]")]
    InvalidMode { field: String, mode: u32 },

    #[error("Invalid or unsupported value for {field} [{value}]")]
    InvalidEnumValue { field: String, value: String },

    // Entry errors
    #[error("Unsupported entry kind for {name} [{kind}]")]
    UnsupportedEntryKind { name: String, kind: EntryType },

    #[error("Streamed entry {name} requires an explicit size")]
    MissingSize { name: String },

    #[error("Size mismatch for {name}: declared {declared} bytes, source produced {actual}")]
    SizeMismatch {
        name: String,
        declared: u64,
        actual: u64,
    },

    // Stream errors
    #[error("Failed reading body for {name}: {source}")]
    SourceRead {
        name: String,
        #[source]
        source: io::Error,
    },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// The archive stream surfaces encoding failures through `io::Result`, so
/// every error must cross into `io::Error` without losing the original.
impl From<TarError> for io::Error {
    fn from(err: TarError) -> Self {
        match err {
            TarError::Io(err) => err,
            err @ TarError::SourceRead { .. } => io::Error::other(err),
            err => io::Error::new(io::ErrorKind::InvalidData, err),
        }
    }
}
