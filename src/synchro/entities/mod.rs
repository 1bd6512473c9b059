//! Entity readers: the byte layout of each kind of Synchro record.
//!
//! Each reader decodes a fixed sequence of typed fields into a [`Row`](crate::synchro::types::row::Row).
//! Regions whose meaning is unknown are kept as `UNKNOWNn` byte fields rather
//! than interpreted.
//!
//! Nesting is driven by the schema, not by the data: the reader for an outer
//! record decides which [`TableKind`] to read next, and the stream constructs
//! the matching reader from this registry.

mod calendar;
mod common;
mod resource;
mod task;

pub use calendar::{
    CalendarReader, DayTypeAssignmentReader, DayTypeReader, TimeRangeReader, WEEKDAY_FIELDS,
};
pub use common::{CommentaryReader, CostReader, UserFieldReader};
pub use resource::{CompanyReader, ResourceReader};
pub use task::{PredecessorReader, ResourceAssignmentReader, TaskReader};

use super::table::{BlockReader, TableReader, UnknownBlockReader, UnknownTableReader};

/// Row magic numbers, one per reader.
pub mod magic {
    pub const CALENDAR: u32 = 0x7FEC_261D;
    pub const DAY_TYPE: u32 = 0x0950_9C6A;
    pub const DAY_TYPE_ASSIGNMENT: u32 = 0x44A3_F3E4;
    pub const COMPANY: u32 = 0x0F5F_2A38;
    pub const RESOURCE: u32 = 0x5B1F_90C7;
    pub const TASK: u32 = 0x2F8A_4D7C;
    pub const PREDECESSOR: u32 = 0x6A3B_7D2E;
    pub const RESOURCE_ASSIGNMENT: u32 = 0x1C7E_5A90;
    pub const COST: u32 = 0x3D9B_6E14;
    pub const COMMENTARY: u32 = 0x52E8_C0A1;
    pub const USER_FIELD: u32 = 0x60D4_B2F3;
    pub const TASK_UNKNOWN: u32 = 0x7B2B_95C1;
}

/// The kinds of framed table an entity reader can nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Calendar,
    DayType,
    DayTypeAssignment,
    Company,
    Resource,
    Task,
    Predecessor,
    ResourceAssignment,
    Cost,
    Commentary,
    UserField,
    /// A table with known framing but opaque fixed-size rows.
    Unknown {
        name: &'static str,
        row_magic: u32,
        row_size: usize,
        uuid_header: bool,
    },
}

impl TableKind {
    /// Construct a fresh reader for this kind of table.
    pub fn reader(self) -> Box<dyn TableReader> {
        match self {
            TableKind::Calendar => Box::new(CalendarReader::default()),
            TableKind::DayType => Box::new(DayTypeReader),
            TableKind::DayTypeAssignment => Box::new(DayTypeAssignmentReader),
            TableKind::Company => Box::new(CompanyReader),
            TableKind::Resource => Box::new(ResourceReader),
            TableKind::Task => Box::new(TaskReader),
            TableKind::Predecessor => Box::new(PredecessorReader),
            TableKind::ResourceAssignment => Box::new(ResourceAssignmentReader),
            TableKind::Cost => Box::new(CostReader),
            TableKind::Commentary => Box::new(CommentaryReader),
            TableKind::UserField => Box::new(UserFieldReader),
            TableKind::Unknown {
                name,
                row_magic,
                row_size,
                uuid_header,
            } => Box::new(UnknownTableReader::new(name, row_magic, row_size, uuid_header)),
        }
    }
}

/// The kinds of fixed-size block run an entity reader can nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    TimeRange,
    Unknown { size: usize },
}

impl BlockKind {
    pub fn reader(self) -> Box<dyn BlockReader> {
        match self {
            BlockKind::TimeRange => Box::new(TimeRangeReader),
            BlockKind::Unknown { size } => Box::new(UnknownBlockReader::new(size)),
        }
    }
}
