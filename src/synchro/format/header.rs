//! File header, version and table directory parsing.

use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, trace};

use super::container::CountingReader;
use crate::synchro::types::error::{Result, SynchroError};
use crate::synchro::types::models::SynchroTable;
use crate::synchro::utils;

/// Size of the opaque block at the start of every file.
pub const HEADER_SIZE: usize = 20;

/// Size of one table directory entry.
pub const DIRECTORY_ENTRY_SIZE: usize = 48;

/// Width of the NUL-padded name field at the start of a directory entry.
pub const DIRECTORY_NAME_SIZE: usize = 40;

/// Position of the u32 table offset within a directory entry.
pub const DIRECTORY_OFFSET_POSITION: usize = 40;

/// Reads the opaque file header.
pub fn read_header<R: Read>(reader: &mut CountingReader<R>) -> Result<[u8; HEADER_SIZE]> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;
    trace!("File header: {}", hex::encode(header));
    Ok(header)
}

/// Reads the application version string that follows the header.
pub fn read_version<R: Read>(reader: &mut CountingReader<R>) -> Result<String> {
    let version = utils::read_string(reader)?.unwrap_or_default();
    debug!("File version: {:?}", version);
    Ok(version)
}

/// Reads directory entries until the terminating empty entry.
///
/// Entries are returned sorted by ascending offset with lengths filled in:
/// each table runs to the start of the next one, and the last table's length
/// is left open.
pub fn read_directory<R: Read>(reader: &mut CountingReader<R>) -> Result<Vec<SynchroTable>> {
    let mut tables = Vec::new();
    loop {
        let mut entry = [0u8; DIRECTORY_ENTRY_SIZE];
        reader.read_exact(&mut entry)?;
        match parse_directory_entry(&entry) {
            Some(table) => tables.push(table),
            None => break,
        }
    }

    let tables = assign_lengths(tables);
    for table in &tables {
        trace!("Directory: {} at {} ({:?} bytes)", table.name, table.offset, table.length);
    }
    Ok(tables)
}

/// Parses one directory entry, or `None` for the terminating entry.
pub fn parse_directory_entry(entry: &[u8; DIRECTORY_ENTRY_SIZE]) -> Option<SynchroTable> {
    let name = utils::read_simple_string(&entry[..DIRECTORY_NAME_SIZE]);
    if name.is_empty() {
        return None;
    }
    let offset = LittleEndian::read_u32(&entry[DIRECTORY_OFFSET_POSITION..DIRECTORY_OFFSET_POSITION + 4]);
    Some(SynchroTable::new(name, u64::from(offset)))
}

/// Sorts tables by offset and derives each length from the next offset.
pub fn assign_lengths(mut tables: Vec<SynchroTable>) -> Vec<SynchroTable> {
    tables.sort();
    let next_offsets: Vec<Option<u64>> = tables
        .iter()
        .skip(1)
        .map(|table| Some(table.offset))
        .chain(std::iter::once(None))
        .collect();

    for (table, next) in tables.iter_mut().zip(next_offsets) {
        table.length = next.map(|next| next - table.offset);
    }
    tables
}

/// Checks that `consumed` bytes have not already passed a table's offset.
pub(crate) fn bytes_to_skip(table: &SynchroTable, consumed: u64) -> Result<u64> {
    table
        .offset
        .checked_sub(consumed)
        .ok_or_else(|| SynchroError::OffsetMismatch {
            table: table.name.clone(),
            offset: table.offset,
            consumed,
        })
}
