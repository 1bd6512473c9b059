//! Synchro SP schedule reader.
//!
//! # Module Organization
//!
//! - [`format`]: Container layer (header, version, table directory, zlib tables)
//! - [`codec`]: Decompression and primitive value conversions
//! - [`stream`]: Typed cursor over one decompressed table
//! - [`table`]: Table and block framing shared by every entity reader
//! - [`entities`]: Field layouts of calendars, resources, tasks and their children
//! - [`project`]: The project model the reader builds
//! - [`sink`]: Optional observer of decoded rows
//!
//! # Data flow
//!
//! ```text
//! Read ──► SynchroData::process ──► table bytes ──► StreamReader
//!                                                     │
//!                      entity readers ◄── read_table ─┘
//!                            │
//!                            ▼
//!                     Rows ──► SynchroReader (two passes) ──► ProjectFile
//! ```

pub mod codec;
pub mod entities;
pub mod format;
pub mod project;
pub mod sink;
pub mod stream;
pub mod table;
pub mod types;
pub mod utils;
mod reader;

pub use reader::{map_constraint, relation_type, required_tables, SynchroReader};
pub use types::error::{MagicPosition, Result, SynchroError};
