//! Low-level byte reading utilities shared by the container parser and the
//! table stream reader.

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::{UTF_16LE, UTF_8};

use super::types::error::{Result, SynchroError};

/// Tag byte introducing a string with a one-byte length.
const STRING_TAG: u8 = 0x01;

/// Tag or length byte meaning "a longer length follows".
const EXTENDED_LENGTH: u8 = 0xFF;

/// Extended length announcing a UTF-16LE string.
const UTF16_MARKER: u16 = 0xFFFE;

/// Read a length-prefixed Synchro string.
///
/// Layout:
/// - 1 byte: tag, `0x01` followed by a one-byte length, or `0xFF` meaning the
///   length is `0xFF`
/// - a length of `0xFF` is replaced by a following u16 length
/// - a u16 length of `0xFFFE` means a UTF-16LE string whose length in code
///   units is the next byte
///
/// A zero length is an absent string.
pub fn read_string(reader: &mut impl Read) -> Result<Option<String>> {
    let tag = reader.read_u8()?;
    let mut length = match tag {
        STRING_TAG => usize::from(reader.read_u8()?),
        EXTENDED_LENGTH => usize::from(EXTENDED_LENGTH),
        other => return Err(SynchroError::UnexpectedStringFormat(other)),
    };

    let mut encoding = UTF_8;
    if length == usize::from(EXTENDED_LENGTH) {
        let extended = reader.read_u16::<LittleEndian>()?;
        if extended == UTF16_MARKER {
            encoding = UTF_16LE;
            length = usize::from(reader.read_u8()?) * 2;
        } else {
            length = usize::from(extended);
        }
    }

    if length == 0 {
        return Ok(None);
    }

    let mut bytes = vec![0u8; length];
    reader.read_exact(&mut bytes)?;
    let (text, _, _) = encoding.decode(&bytes);
    Ok(Some(text.into_owned()))
}

/// Extract a NUL-terminated ASCII string from the start of a fixed-size field.
pub fn read_simple_string(field: &[u8]) -> String {
    field
        .iter()
        .take_while(|&&byte| byte != 0)
        .map(|&byte| char::from(byte))
        .collect()
}
