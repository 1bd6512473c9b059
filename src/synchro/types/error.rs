//! Custom error types for the synchro-reader crate.

use thiserror::Error;

/// Where in a record stream a magic number was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicPosition {
    /// The sentinel opening a table.
    TableOpen,
    /// The sentinel opening an individual row.
    Row,
    /// The sentinel closing a table.
    TableClose,
}

impl std::fmt::Display for MagicPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MagicPosition::TableOpen => write!(f, "table header"),
            MagicPosition::Row => write!(f, "row header"),
            MagicPosition::TableClose => write!(f, "table trailer"),
        }
    }
}

/// The primary error type for all operations in this crate.
///
/// Every variant except `Io` on an unreadable path describes a malformed file.
/// None of them are recoverable: a decode either completes or returns one of these.
#[derive(Debug, Error)]
pub enum SynchroError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// A table or row sentinel did not carry the expected value.
    #[error("Unexpected {position} magic number in {reader} table: expected {expected:#010x}, found {found:#010x}")]
    BadMagic {
        reader: &'static str,
        position: MagicPosition,
        expected: u32,
        found: u32,
    },

    /// The container has already consumed more bytes than a table's declared offset.
    #[error("Offset mismatch for table {table}: declared offset {offset}, but {consumed} bytes already consumed")]
    OffsetMismatch {
        table: String,
        offset: u64,
        consumed: u64,
    },

    /// A table buffer ended before a read could be satisfied.
    #[error("Truncated data: needed {needed} bytes, but only {available} available")]
    Truncated { needed: usize, available: usize },

    /// A string field did not start with a recognised tag byte.
    #[error("Unexpected string format tag: {0:#04x}")]
    UnexpectedStringFormat(u8),

    /// A primitive value decoded to something outside its domain.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A compressed table payload could not be inflated.
    #[error("Decompression failed for table {table}: {source}")]
    Decompression {
        table: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is structurally invalid.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// A convenience `Result` type alias using the crate's `SynchroError` type.
pub type Result<T> = std::result::Result<T, SynchroError>;
