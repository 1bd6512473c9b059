//! Codec layer for decompression and primitive value conversion.
//!
//! # Submodules
//!
//! - [`compression`][]: Table payload inflation (zlib via flate2)
//! - [`datatypes`][]: Fixed encodings of UUIDs, dates, times, durations and doubles

pub mod compression;
pub mod datatypes;
