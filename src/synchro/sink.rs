//! Optional observer of a decode session.
//!
//! A [`DecodeSink`] is handed to [`SynchroReader::with_sink`](crate::SynchroReader::with_sink)
//! and is told about the file version, each table read from the container, and
//! every row produced by a table reader. It is the tool for reverse-engineering
//! the opaque regions of the format: rows carry their `UNKNOWN` fields verbatim.
//!
//! Sinks take `&self`; implementations that collect state use interior
//! mutability.

use log::debug;

use super::types::models::SynchroTable;
use super::types::row::Row;

pub trait DecodeSink {
    /// Called once with the version string from the file header.
    fn version(&self, _version: &str) {}

    /// Called before a table's payload is decompressed.
    fn table(&self, _table: &SynchroTable) {}

    /// Called after each row has been fully decoded, nested tables included.
    fn row(&self, _reader: &'static str, _row: &Row) {}
}

/// A sink that forwards everything to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DecodeSink for LogSink {
    fn version(&self, version: &str) {
        debug!("VERSION {}", version);
    }

    fn table(&self, table: &SynchroTable) {
        debug!(
            "TABLE {} offset={} length={:?}",
            table.name, table.offset, table.length
        );
    }

    fn row(&self, reader: &'static str, row: &Row) {
        let fields: Vec<String> = row
            .iter()
            .map(|(name, value)| format!("{}={:?}", name, value))
            .collect();
        debug!("{} {{{}}}", reader, fields.join(", "));
    }
}
