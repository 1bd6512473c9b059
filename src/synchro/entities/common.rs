//! Readers for small tables shared by tasks and resources.

use super::magic;
use crate::synchro::stream::StreamReader;
use crate::synchro::table::TableReader;
use crate::synchro::types::error::Result;
use crate::synchro::types::row::{Row, Value};

/// Titled free-text notes.
#[derive(Debug, Default)]
pub struct CommentaryReader;

impl TableReader for CommentaryReader {
    fn name(&self) -> &'static str {
        "Commentary"
    }

    fn row_magic_number(&self) -> u32 {
        magic::COMMENTARY
    }

    fn read_row(&mut self, stream: &mut StreamReader<'_>, row: &mut Row) -> Result<()> {
        row.put("TITLE", stream.read_string()?);
        row.put("TEXT", stream.read_string()?);
        row.put("UNKNOWN1", Value::Bytes(stream.read_unknown(4)?));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CostReader;

impl TableReader for CostReader {
    fn name(&self) -> &'static str {
        "Cost"
    }

    fn row_magic_number(&self) -> u32 {
        magic::COST
    }

    fn read_row(&mut self, stream: &mut StreamReader<'_>, row: &mut Row) -> Result<()> {
        row.put("NAME", stream.read_string()?);
        row.put("QUANTITY", Value::Integer(stream.read_long()?));
        row.put("AMOUNT", Value::Double(stream.read_double()?));
        row.put("UNKNOWN1", Value::Bytes(stream.read_unknown(8)?));
        Ok(())
    }
}

/// A user-defined attribute: name, type code and textual value.
#[derive(Debug, Default)]
pub struct UserFieldReader;

impl TableReader for UserFieldReader {
    fn name(&self) -> &'static str {
        "UserField"
    }

    fn row_magic_number(&self) -> u32 {
        magic::USER_FIELD
    }

    fn has_uuid_header(&self) -> bool {
        false
    }

    fn read_row(&mut self, stream: &mut StreamReader<'_>, row: &mut Row) -> Result<()> {
        row.put("NAME", stream.read_string()?);
        row.put("TYPE", Value::Integer(i64::from(stream.read_short()?)));
        row.put("VALUE", stream.read_string()?);
        Ok(())
    }
}
