//! Table extraction from the container.
//!
//! The directory gives each table's absolute offset. Tables are visited in
//! ascending offset order, which is also stream order, so the input is read
//! strictly once from front to back. Tables nobody asked for are stepped over
//! without being decompressed.

use std::collections::HashMap;
use std::io::{self, Read};

use log::{debug, info, warn};

use super::header;
use crate::synchro::codec::compression;
use crate::synchro::sink::DecodeSink;
use crate::synchro::types::error::{Result, SynchroError};
use crate::synchro::types::models::{SynchroTable, SynchroVersion};
use crate::synchro::utils;

/// A reader adapter that counts the bytes consumed from the underlying stream.
pub struct CountingReader<R> {
    inner: R,
    consumed: u64,
}

impl<R: Read> CountingReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, consumed: 0 }
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Discards exactly `count` bytes.
    fn skip(&mut self, count: u64) -> Result<()> {
        let skipped = io::copy(&mut self.by_ref().take(count), &mut io::sink())?;
        if skipped != count {
            return Err(SynchroError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected to skip {} bytes, stream ended after {}", count, skipped),
            )));
        }
        Ok(())
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = self.inner.read(buf)?;
        self.consumed += count as u64;
        Ok(count)
    }
}

/// The decompressed tables of one file.
#[derive(Debug)]
pub struct SynchroData {
    version_text: String,
    version: SynchroVersion,
    tables: Vec<SynchroTable>,
    table_data: HashMap<String, Vec<u8>>,
}

impl SynchroData {
    /// Reads the container from `input`, inflating each table named in `required`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The stream ends early
    /// - A table's offset lies behind bytes already consumed
    /// - A table payload is not valid zlib data
    pub fn process<R: Read>(
        input: R,
        required: &[&str],
        sink: Option<&dyn DecodeSink>,
    ) -> Result<Self> {
        Self::process_with(input, |_| required.to_vec(), sink)
    }

    /// Like [`process`](Self::process), but picks the tables to inflate once
    /// the file version is known.
    pub fn process_with<'n, R, F>(
        input: R,
        required: F,
        sink: Option<&dyn DecodeSink>,
    ) -> Result<Self>
    where
        R: Read,
        F: FnOnce(SynchroVersion) -> Vec<&'n str>,
    {
        let mut reader = CountingReader::new(input);

        header::read_header(&mut reader)?;
        let version_text = header::read_version(&mut reader)?;
        if let Some(sink) = sink {
            sink.version(&version_text);
        }
        let version = SynchroVersion::parse(&version_text);
        let required = required(version);

        let tables = header::read_directory(&mut reader)?;
        info!("Synchro file version {}: {} tables in directory", version, tables.len());

        let mut table_data = HashMap::new();
        for table in &tables {
            if !required.contains(&table.name.as_str()) {
                debug!("Skipping table {}", table.name);
                continue;
            }
            if let Some(sink) = sink {
                sink.table(table);
            }
            let data = read_table(&mut reader, table)?;
            table_data.insert(table.name.clone(), data);
        }

        for name in &required {
            if !table_data.contains_key(*name) {
                debug!("Table {} not present in file", name);
            }
        }

        Ok(Self {
            version_text,
            version,
            tables,
            table_data,
        })
    }

    pub fn version(&self) -> SynchroVersion {
        self.version
    }

    /// The version string exactly as stored.
    pub fn version_text(&self) -> &str {
        &self.version_text
    }

    /// Directory entries in ascending offset order.
    pub fn tables(&self) -> &[SynchroTable] {
        &self.tables
    }

    /// Removes and returns the decompressed bytes of a table.
    ///
    /// Each buffer is handed out once so it can be dropped as soon as its
    /// reader is done with it.
    pub fn take_table_data(&mut self, name: &str) -> Option<Vec<u8>> {
        let data = self.table_data.remove(name);
        if data.is_none() {
            warn!("Table {} is missing, treating it as empty", name);
        }
        data
    }
}

/// Reads and inflates one table, starting at or before its declared offset.
fn read_table<R: Read>(reader: &mut CountingReader<R>, table: &SynchroTable) -> Result<Vec<u8>> {
    let skip = header::bytes_to_skip(table, reader.consumed())?;
    if skip != 0 {
        debug!("Skipping {} bytes to reach table {}", skip, table.name);
        reader.skip(skip)?;
    }

    let name_start = reader.consumed();
    let stored_name = utils::read_string(reader)?.unwrap_or_default();
    let name_length = reader.consumed() - name_start;
    if stored_name != table.name {
        warn!("Table {} is stored under the name {:?}", table.name, stored_name);
    }

    let mut compressed = Vec::new();
    match table.length {
        Some(length) => {
            let data_length = length.checked_sub(name_length).ok_or_else(|| {
                SynchroError::InvalidFormat(format!(
                    "table {} is {} bytes long but its name takes {}",
                    table.name, length, name_length
                ))
            })?;
            reader.by_ref().take(data_length).read_to_end(&mut compressed)?;
            if compressed.len() as u64 != data_length {
                return Err(SynchroError::Truncated {
                    needed: data_length as usize,
                    available: compressed.len(),
                });
            }
        }
        None => {
            reader.read_to_end(&mut compressed)?;
        }
    }

    debug!("Read table {}: {} compressed bytes", table.name, compressed.len());
    compression::inflate_table(&table.name, &compressed)
}
