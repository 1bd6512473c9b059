//! Readers for tables and blocks whose contents are not understood.
//!
//! The framing of these regions is known, so they can be stepped over safely,
//! but each record body is kept as a single opaque `UNKNOWN` byte field.

use super::{BlockReader, TableReader};
use crate::synchro::stream::StreamReader;
use crate::synchro::types::error::Result;
use crate::synchro::types::row::{Row, Value};

#[derive(Debug, Clone, Copy)]
pub struct UnknownTableReader {
    name: &'static str,
    row_magic: u32,
    row_size: usize,
    uuid_header: bool,
}

impl UnknownTableReader {
    pub fn new(name: &'static str, row_magic: u32, row_size: usize, uuid_header: bool) -> Self {
        Self {
            name,
            row_magic,
            row_size,
            uuid_header,
        }
    }
}

impl TableReader for UnknownTableReader {
    fn name(&self) -> &'static str {
        self.name
    }

    fn row_magic_number(&self) -> u32 {
        self.row_magic
    }

    fn has_uuid_header(&self) -> bool {
        self.uuid_header
    }

    fn read_row(&mut self, stream: &mut StreamReader<'_>, row: &mut Row) -> Result<()> {
        row.put("UNKNOWN", Value::Bytes(stream.read_unknown(self.row_size)?));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UnknownBlockReader {
    size: usize,
}

impl UnknownBlockReader {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl BlockReader for UnknownBlockReader {
    fn name(&self) -> &'static str {
        "UnknownBlock"
    }

    fn block_size(&self) -> usize {
        self.size
    }

    fn read_block(&mut self, block: &[u8], row: &mut Row) -> Result<()> {
        row.put("UNKNOWN", Value::Bytes(block.to_vec()));
        Ok(())
    }
}
