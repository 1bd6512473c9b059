//! Typed reads from a decompressed table buffer.
//!
//! A [`StreamReader`] owns a cursor over one table's bytes. Entity readers pull
//! primitive values from it in schema order, and use it to read nested tables:
//! the nested reader is bound to the same stream, so its records are consumed
//! in place.

use byteorder::{ByteOrder, LittleEndian};
use chrono::{NaiveDateTime, NaiveTime};
use log::trace;
use uuid::Uuid;

use super::codec::datatypes;
use super::entities::{BlockKind, TableKind};
use super::sink::DecodeSink;
use super::table;
use super::types::error::{Result, SynchroError};
use super::types::models::Duration;
use super::types::row::Row;
use super::utils;

/// Deepest nesting of tables inside a single table buffer.
pub const MAX_TABLE_DEPTH: usize = 64;

pub struct StreamReader<'a> {
    data: &'a [u8],
    position: usize,
    depth: usize,
    sink: Option<&'a dyn DecodeSink>,
}

impl<'a> StreamReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            depth: 0,
            sink: None,
        }
    }

    /// Report every decoded row to `sink`.
    pub fn with_sink(mut self, sink: Option<&'a dyn DecodeSink>) -> Self {
        self.sink = sink;
        self
    }

    pub(crate) fn sink(&self) -> Option<&'a dyn DecodeSink> {
        self.sink
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Read a raw block of `size` bytes.
    pub fn read_bytes(&mut self, size: usize) -> Result<&'a [u8]> {
        if size > self.remaining() {
            return Err(SynchroError::Truncated {
                needed: size,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + size];
        self.position += size;
        Ok(bytes)
    }

    /// Read an opaque region and keep a copy of it.
    pub fn read_unknown(&mut self, size: usize) -> Result<Vec<u8>> {
        let bytes = self.read_bytes(size)?;
        trace!("Opaque region at {}: {}", self.position - size, hex::encode(bytes));
        Ok(bytes.to_vec())
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_boolean(&mut self) -> Result<bool> {
        Ok(self.read_byte()? != 0)
    }

    pub fn read_short(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_int(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_long(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.read_bytes(8)?))
    }

    pub fn read_string(&mut self) -> Result<Option<String>> {
        let mut cursor = &self.data[self.position..];
        let before = cursor.len();
        let value = utils::read_string(&mut cursor).map_err(|e| match e {
            SynchroError::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                SynchroError::Truncated {
                    needed: before + 1,
                    available: before,
                }
            }
            other => other,
        })?;
        self.position += before - cursor.len();
        Ok(value)
    }

    pub fn read_uuid(&mut self) -> Result<Uuid> {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(self.read_bytes(16)?);
        Ok(datatypes::uuid_from_bytes(bytes))
    }

    pub fn read_date(&mut self) -> Result<Option<NaiveDateTime>> {
        Ok(datatypes::date_from_seconds(self.read_u32()?))
    }

    pub fn read_time(&mut self) -> Result<NaiveTime> {
        datatypes::time_from_value(self.read_u32()?)
    }

    pub fn read_duration(&mut self) -> Result<Option<Duration>> {
        Ok(datatypes::duration_from_seconds(self.read_u32()?))
    }

    pub fn read_double(&mut self) -> Result<f64> {
        Ok(datatypes::double_from_bits(LittleEndian::read_u64(
            self.read_bytes(8)?,
        )))
    }

    /// Read a nested table with the reader selected by `kind`.
    ///
    /// # Errors
    /// Returns [`SynchroError::InvalidFormat`] if tables are nested more than
    /// [`MAX_TABLE_DEPTH`] levels deep.
    pub fn read_table(&mut self, kind: TableKind) -> Result<Vec<Row>> {
        if self.depth >= MAX_TABLE_DEPTH {
            return Err(SynchroError::InvalidFormat(format!(
                "tables nested more than {} levels deep at offset {}",
                MAX_TABLE_DEPTH, self.position
            )));
        }
        let mut reader = kind.reader();
        self.depth += 1;
        let rows = table::read_table(reader.as_mut(), self);
        self.depth -= 1;
        rows
    }

    /// Read a nested table preceded by a presence flag.
    ///
    /// A `false` flag means the table is absent: the result is empty and only
    /// the flag byte is consumed.
    pub fn read_table_conditional(&mut self, kind: TableKind) -> Result<Vec<Row>> {
        if self.read_boolean()? {
            self.read_table(kind)
        } else {
            Ok(Vec::new())
        }
    }

    /// Read a counted run of fixed-size blocks with the reader selected by `kind`.
    pub fn read_blocks(&mut self, kind: BlockKind) -> Result<Vec<Row>> {
        let mut reader = kind.reader();
        table::read_blocks(reader.as_mut(), self)
    }
}
