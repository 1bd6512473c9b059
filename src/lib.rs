//! # synchro-reader
//!
//! A reader for Synchro SP schedule files.
//!
//! An SP file is a container of zlib-compressed tables. Each table holds a
//! framed sequence of records whose fields are read in a fixed order, and
//! records nest other tables inside them. The reader decodes calendars,
//! resources, tasks, predecessors and resource assignments into a
//! [`ProjectFile`].
//!
//! ```no_run
//! use synchro_reader::SynchroReader;
//!
//! let project = SynchroReader::new().read_file("schedule.sp")?;
//! for task in project.tasks() {
//!     println!("{:?} {:?}", task.name, task.start);
//! }
//! # Ok::<(), synchro_reader::SynchroError>(())
//! ```
//!
//! Writing SP files is not supported.
pub mod synchro;

// Re-export the main types for convenience
pub use synchro::{
    project::{
        CalendarId, ConstraintType, ProjectCalendar, ProjectFile, ProjectProperties, Relation,
        RelationType, Resource, ResourceAssignment, ResourceId, Task, TaskId, TimeRange,
    },
    sink::{DecodeSink, LogSink},
    types::{
        models::{Duration, SynchroTable, SynchroVersion},
        row::{Row, Value},
    },
    Result, SynchroError, SynchroReader,
};
