//! Table and block reader framework.
//!
//! Every table in a Synchro file is a homogeneous run of records framed by
//! magic numbers:
//!
//! ```text
//! [4 bytes] 0x39AF547A          table open
//! [4 bytes] record count N
//! N times:
//!   [4 bytes] row magic         reader specific
//!   [16 + 16 bytes]             reserved block + UUID, if the reader has a UUID header
//!   [...]                       reader specific fields
//! [4 bytes] 0x6F99E416          table close
//! [...]                         optional post-trailer data
//! ```
//!
//! Blocks are the lightweight variant used for small fixed-size structures: a
//! count followed by that many fixed-size slices, with no framing at all.
//!
//! Any framing mismatch aborts the decode. There is no resynchronisation.

mod unknown;

pub use unknown::{UnknownBlockReader, UnknownTableReader};

use log::trace;

use super::stream::StreamReader;
use super::types::error::{MagicPosition, Result, SynchroError};
use super::types::row::Row;

/// Sentinel opening every table.
pub const TABLE_OPEN_MAGIC: u32 = 0x39AF_547A;

/// Sentinel closing every table.
pub const TABLE_CLOSE_MAGIC: u32 = 0x6F99_E416;

/// Size of the reserved block preceding a row UUID.
pub const UUID_HEADER_RESERVED: usize = 16;

/// Decoder for one kind of framed record.
pub trait TableReader {
    /// Name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Sentinel expected at the start of every row.
    fn row_magic_number(&self) -> u32;

    /// Whether each row starts with a reserved block followed by a `UUID` field.
    fn has_uuid_header(&self) -> bool {
        true
    }

    /// Decode the entity-specific fields of one row.
    fn read_row(&mut self, stream: &mut StreamReader<'_>, row: &mut Row) -> Result<()>;

    /// Hook run once after the table trailer.
    fn post_trailer(&mut self, _stream: &mut StreamReader<'_>) -> Result<()> {
        Ok(())
    }
}

/// Decoder for one kind of fixed-size block.
pub trait BlockReader {
    fn name(&self) -> &'static str;

    fn block_size(&self) -> usize;

    fn read_block(&mut self, block: &[u8], row: &mut Row) -> Result<()>;
}

/// Run the table state machine with `reader`, returning one row per record.
pub fn read_table(reader: &mut dyn TableReader, stream: &mut StreamReader<'_>) -> Result<Vec<Row>> {
    expect_magic(stream, reader.name(), MagicPosition::TableOpen, TABLE_OPEN_MAGIC)?;

    let count = stream.read_u32()?;
    trace!("{} table: {} rows at offset {}", reader.name(), count, stream.position());

    // Cap the preallocation; the count comes straight from the file.
    let mut rows = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        expect_magic(stream, reader.name(), MagicPosition::Row, reader.row_magic_number())?;

        let mut row = Row::new();
        if reader.has_uuid_header() {
            stream.read_bytes(UUID_HEADER_RESERVED)?;
            row.put("UUID", stream.read_uuid()?);
        }
        reader.read_row(stream, &mut row)?;

        trace!("{} row {:?}", reader.name(), row.get_string("NAME"));
        if let Some(sink) = stream.sink() {
            sink.row(reader.name(), &row);
        }
        rows.push(row);
    }

    expect_magic(stream, reader.name(), MagicPosition::TableClose, TABLE_CLOSE_MAGIC)?;
    reader.post_trailer(stream)?;

    Ok(rows)
}

/// Run the block loop with `reader`: a count, then that many fixed-size blocks.
pub fn read_blocks(reader: &mut dyn BlockReader, stream: &mut StreamReader<'_>) -> Result<Vec<Row>> {
    let count = stream.read_u32()?;
    let size = reader.block_size();
    trace!("{} blocks: {} x {} bytes", reader.name(), count, size);

    let mut rows = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        let block = stream.read_bytes(size)?;
        let mut row = Row::new();
        reader.read_block(block, &mut row)?;
        if let Some(sink) = stream.sink() {
            sink.row(reader.name(), &row);
        }
        rows.push(row);
    }

    Ok(rows)
}

fn expect_magic(
    stream: &mut StreamReader<'_>,
    reader: &'static str,
    position: MagicPosition,
    expected: u32,
) -> Result<()> {
    let found = stream.read_u32()?;
    if found != expected {
        return Err(SynchroError::BadMagic {
            reader,
            position,
            expected,
            found,
        });
    }
    Ok(())
}
