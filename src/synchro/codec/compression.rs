//! Decompression of Synchro table payloads.
//!
//! Every table body is a single zlib stream (deflate with the two-byte zlib
//! header and Adler-32 trailer). The decompressed size is not recorded in the
//! file, so the output buffer grows as needed.

use std::io::Read;

use flate2::read::ZlibDecoder;
use log::trace;

use crate::synchro::types::error::{Result, SynchroError};

/// Inflates the compressed payload of table `table`.
///
/// # Errors
/// Returns [`SynchroError::Decompression`] naming the table if the payload is
/// not a valid zlib stream.
pub fn inflate_table(table: &str, payload: &[u8]) -> Result<Vec<u8>> {
    trace!("Inflating table {}: {} compressed bytes", table, payload.len());

    let mut output = Vec::with_capacity(payload.len() * 4);
    let mut decoder = ZlibDecoder::new(payload);
    decoder
        .read_to_end(&mut output)
        .map_err(|source| SynchroError::Decompression {
            table: table.to_string(),
            source,
        })?;

    trace!("Table {} inflated to {} bytes", table, output.len());
    Ok(output)
}
