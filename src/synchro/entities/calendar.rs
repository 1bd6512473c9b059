//! Calendar readers.
//!
//! A calendar names one day type per weekday and lists date-specific
//! overrides. The day types themselves, each a list of working time ranges,
//! are stored inside the calendar record. The UUID of the project's default
//! calendar follows the calendar table's trailer.

use byteorder::{ByteOrder, LittleEndian};
use uuid::Uuid;

use super::{magic, BlockKind, TableKind};
use crate::synchro::codec::datatypes;
use crate::synchro::stream::StreamReader;
use crate::synchro::table::{BlockReader, TableReader};
use crate::synchro::types::error::Result;
use crate::synchro::types::row::{Row, Value};

/// Field names of the weekday day-type references, Sunday first.
pub const WEEKDAY_FIELDS: [&str; 7] = [
    "SUNDAY_DAY_TYPE",
    "MONDAY_DAY_TYPE",
    "TUESDAY_DAY_TYPE",
    "WEDNESDAY_DAY_TYPE",
    "THURSDAY_DAY_TYPE",
    "FRIDAY_DAY_TYPE",
    "SATURDAY_DAY_TYPE",
];

#[derive(Debug, Default)]
pub struct CalendarReader {
    default_calendar_uuid: Option<Uuid>,
}

impl CalendarReader {
    /// UUID of the default calendar, available once the table has been read.
    pub fn default_calendar_uuid(&self) -> Option<Uuid> {
        self.default_calendar_uuid
    }
}

impl TableReader for CalendarReader {
    fn name(&self) -> &'static str {
        "Calendar"
    }

    fn row_magic_number(&self) -> u32 {
        magic::CALENDAR
    }

    fn read_row(&mut self, stream: &mut StreamReader<'_>, row: &mut Row) -> Result<()> {
        row.put("NAME", stream.read_string()?);
        row.put("UNKNOWN1", Value::Bytes(stream.read_unknown(8)?));
        for field in WEEKDAY_FIELDS {
            row.put(field, stream.read_uuid()?);
        }
        row.put("UNKNOWN2", Value::Bytes(stream.read_unknown(4)?));
        row.put("DAY_TYPE_ASSIGNMENTS", stream.read_table(TableKind::DayTypeAssignment)?);
        row.put("DAY_TYPES", stream.read_table(TableKind::DayType)?);
        row.put("UNKNOWN3", Value::Bytes(stream.read_unknown(8)?));
        Ok(())
    }

    fn post_trailer(&mut self, stream: &mut StreamReader<'_>) -> Result<()> {
        self.default_calendar_uuid = Some(stream.read_uuid()?);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct DayTypeReader;

impl TableReader for DayTypeReader {
    fn name(&self) -> &'static str {
        "DayType"
    }

    fn row_magic_number(&self) -> u32 {
        magic::DAY_TYPE
    }

    fn read_row(&mut self, stream: &mut StreamReader<'_>, row: &mut Row) -> Result<()> {
        row.put("NAME", stream.read_string()?);
        row.put("UNKNOWN1", Value::Bytes(stream.read_unknown(4)?));
        row.put("TIME_RANGES", stream.read_blocks(BlockKind::TimeRange)?);
        row.put("UNKNOWN2", Value::Bytes(stream.read_unknown(4)?));
        Ok(())
    }
}

/// Maps one calendar date to a day type.
#[derive(Debug, Default)]
pub struct DayTypeAssignmentReader;

impl TableReader for DayTypeAssignmentReader {
    fn name(&self) -> &'static str {
        "DayTypeAssignment"
    }

    fn row_magic_number(&self) -> u32 {
        magic::DAY_TYPE_ASSIGNMENT
    }

    fn has_uuid_header(&self) -> bool {
        false
    }

    fn read_row(&mut self, stream: &mut StreamReader<'_>, row: &mut Row) -> Result<()> {
        row.put("DATE", stream.read_date()?);
        row.put("DAY_TYPE_UUID", stream.read_uuid()?);
        Ok(())
    }
}

/// A working period within a day type: two times of day.
#[derive(Debug, Default)]
pub struct TimeRangeReader;

impl BlockReader for TimeRangeReader {
    fn name(&self) -> &'static str {
        "TimeRange"
    }

    fn block_size(&self) -> usize {
        8
    }

    fn read_block(&mut self, block: &[u8], row: &mut Row) -> Result<()> {
        row.put("START", Value::Time(datatypes::time_from_value(LittleEndian::read_u32(&block[0..4]))?));
        row.put("END", Value::Time(datatypes::time_from_value(LittleEndian::read_u32(&block[4..8]))?));
        Ok(())
    }
}
