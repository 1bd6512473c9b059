//! Company and resource readers.
//!
//! Files written before 6.2 hold resources under companies; later files have
//! a top-level resource table. Resources nest recursively in both layouts.

use super::{magic, TableKind};
use crate::synchro::stream::StreamReader;
use crate::synchro::table::TableReader;
use crate::synchro::types::error::Result;
use crate::synchro::types::row::{Row, Value};

#[derive(Debug, Default)]
pub struct CompanyReader;

impl TableReader for CompanyReader {
    fn name(&self) -> &'static str {
        "Company"
    }

    fn row_magic_number(&self) -> u32 {
        magic::COMPANY
    }

    fn read_row(&mut self, stream: &mut StreamReader<'_>, row: &mut Row) -> Result<()> {
        row.put("NAME", stream.read_string()?);
        row.put("UNKNOWN1", Value::Bytes(stream.read_unknown(8)?));
        row.put("RESOURCES", stream.read_table(TableKind::Resource)?);
        row.put("UNKNOWN2", Value::Bytes(stream.read_unknown(4)?));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ResourceReader;

impl TableReader for ResourceReader {
    fn name(&self) -> &'static str {
        "Resource"
    }

    fn row_magic_number(&self) -> u32 {
        magic::RESOURCE
    }

    fn read_row(&mut self, stream: &mut StreamReader<'_>, row: &mut Row) -> Result<()> {
        row.put("NAME", stream.read_string()?);
        row.put("ID", stream.read_string()?);
        row.put("UNKNOWN1", Value::Bytes(stream.read_unknown(6)?));
        row.put("DESCRIPTION", stream.read_string()?);
        row.put("SUPPLY_REFERENCE", stream.read_string()?);
        row.put("EMAIL", stream.read_string()?);
        row.put("URL", stream.read_string()?);
        row.put("UNKNOWN2", Value::Bytes(stream.read_unknown(12)?));
        row.put("COMMENTARY", stream.read_table_conditional(TableKind::Commentary)?);
        row.put("USER_FIELDS", stream.read_table_conditional(TableKind::UserField)?);
        row.put("RESOURCES", stream.read_table(TableKind::Resource)?);
        row.put("UNKNOWN3", Value::Bytes(stream.read_unknown(4)?));
        Ok(())
    }
}
