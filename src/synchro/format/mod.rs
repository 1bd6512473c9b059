//! Container parsing layer for Synchro SP files.
//!
//! # Module Organization
//!
//! - [`header`]: Opaque file header, version string and table directory
//! - [`container`]: Walks the tables in offset order and inflates their payloads
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌──────────────────────┐
//! │  Header (20 bytes)   │ ← header::read_header()
//! │  Version string      │ ← header::read_version()
//! ├──────────────────────┤
//! │  Table directory     │ ← header::read_directory()
//! │  (48-byte entries,   │
//! │   empty name ends)   │
//! ├──────────────────────┤
//! │  Table name          │ ← container::SynchroData::process()
//! │  zlib payload        │
//! │  ... per table, in   │
//! │  ascending offset    │
//! └──────────────────────┘
//! ```

pub mod container;
pub mod header;
