//! Task readers.
//!
//! A task record carries its own subtasks, so the task table is a tree.
//! Predecessors and resource assignments are stored on the successor task and
//! refer to other entities by UUID only.

use super::{magic, TableKind};
use crate::synchro::stream::StreamReader;
use crate::synchro::table::TableReader;
use crate::synchro::types::error::Result;
use crate::synchro::types::row::{Row, Value};

/// Opaque per-task table of 12-byte records that sits between the
/// predecessors and the subtasks.
const TASK_UNKNOWN_TABLE: TableKind = TableKind::Unknown {
    name: "TaskUnknown",
    row_magic: magic::TASK_UNKNOWN,
    row_size: 12,
    uuid_header: false,
};

#[derive(Debug, Default)]
pub struct TaskReader;

impl TableReader for TaskReader {
    fn name(&self) -> &'static str {
        "Task"
    }

    fn row_magic_number(&self) -> u32 {
        magic::TASK
    }

    fn read_row(&mut self, stream: &mut StreamReader<'_>, row: &mut Row) -> Result<()> {
        row.put("ID", stream.read_string()?);
        row.put("NAME", stream.read_string()?);
        row.put("UNKNOWN1", Value::Bytes(stream.read_unknown(12)?));
        row.put("STATUS", Value::Integer(i64::from(stream.read_int()?)));
        row.put("START", stream.read_date()?);
        row.put("DURATION", stream.read_duration()?);
        row.put("REMAINING_DURATION", stream.read_duration()?);
        row.put("ACTUAL_START", stream.read_date()?);
        row.put("ACTUAL_FINISH", stream.read_date()?);
        row.put("PLANNED_FINISH", stream.read_date()?);
        row.put("ESTIMATED_FINISH", stream.read_date()?);
        row.put("CALENDAR_UUID", stream.read_uuid()?);
        row.put("CONSTRAINT_TYPE", Value::Integer(i64::from(stream.read_int()?)));
        row.put("CONSTRAINT_EARLY_DATE", stream.read_date()?);
        row.put("CONSTRAINT_LATE_DATE", stream.read_date()?);
        row.put("PERCENT_COMPLETE", Value::Double(stream.read_double()?));
        row.put("UNKNOWN2", Value::Bytes(stream.read_unknown(16)?));
        row.put("URL", stream.read_string()?);
        row.put("COMMENTARY", stream.read_table_conditional(TableKind::Commentary)?);
        row.put("USER_FIELDS", stream.read_table_conditional(TableKind::UserField)?);
        row.put("COSTS", stream.read_table(TableKind::Cost)?);
        row.put("RESOURCE_ASSIGNMENTS", stream.read_table(TableKind::ResourceAssignment)?);
        row.put("PREDECESSORS", stream.read_table(TableKind::Predecessor)?);
        row.put("UNKNOWN3", stream.read_table(TASK_UNKNOWN_TABLE)?);
        row.put("TASKS", stream.read_table(TableKind::Task)?);
        row.put("UNKNOWN4", Value::Bytes(stream.read_unknown(4)?));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct PredecessorReader;

impl TableReader for PredecessorReader {
    fn name(&self) -> &'static str {
        "Predecessor"
    }

    fn row_magic_number(&self) -> u32 {
        magic::PREDECESSOR
    }

    fn read_row(&mut self, stream: &mut StreamReader<'_>, row: &mut Row) -> Result<()> {
        row.put("PREDECESSOR_UUID", stream.read_uuid()?);
        row.put("RELATION_TYPE", Value::Integer(i64::from(stream.read_int()?)));
        row.put("LAG_IS_NEGATIVE", Value::Boolean(stream.read_boolean()?));
        row.put("LAG", stream.read_duration()?);
        row.put("CALENDAR_UUID", stream.read_uuid()?);
        row.put("UNKNOWN1", Value::Bytes(stream.read_unknown(8)?));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ResourceAssignmentReader;

impl TableReader for ResourceAssignmentReader {
    fn name(&self) -> &'static str {
        "ResourceAssignment"
    }

    fn row_magic_number(&self) -> u32 {
        magic::RESOURCE_ASSIGNMENT
    }

    fn read_row(&mut self, stream: &mut StreamReader<'_>, row: &mut Row) -> Result<()> {
        row.put("RESOURCE_UUID", stream.read_uuid()?);
        row.put("UNKNOWN1", Value::Bytes(stream.read_unknown(8)?));
        row.put("UNITS", Value::Double(stream.read_double()?));
        row.put("UNKNOWN2", Value::Bytes(stream.read_unknown(4)?));
        Ok(())
    }
}
