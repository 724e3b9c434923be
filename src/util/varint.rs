//! Variable-length integer encoding utilities.
//!
//! Unsigned LEB128: 7 bits per byte, least significant group first, with the
//! high bit of each byte set when another byte follows. Segment records use it
//! for every length prefix and for the delta-encoded document IDs.

use std::io::{self, Read, Write};

use byteorder::ReadBytesExt;

use crate::error::{QuillError, Result};

/// Longest valid encoding of a u64.
pub const MAX_VARINT_LEN: usize = 10;

/// Encode a u64 value using variable-length encoding.
pub fn encode_u64(value: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(MAX_VARINT_LEN);
    let mut val = value;

    loop {
        let mut byte = (val & 0x7F) as u8;
        val >>= 7;

        if val != 0 {
            byte |= 0x80; // Set continuation bit
        }

        bytes.push(byte);

        if val == 0 {
            break;
        }
    }

    bytes
}

/// Decode a u64 value from variable-length encoding.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_u64(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut result = 0u64;
    let mut shift = 0;
    let mut bytes_read = 0;

    for &byte in bytes {
        bytes_read += 1;
        result = accumulate(result, byte, shift)?;

        if (byte & 0x80) == 0 {
            return Ok((result, bytes_read));
        }

        shift += 7;
    }

    Err(QuillError::format("incomplete varint"))
}

/// Write a variable-length encoded u64 to a writer.
pub fn write_u64<W: Write>(writer: &mut W, value: u64) -> Result<usize> {
    let bytes = encode_u64(value);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Read a variable-length encoded u64 from a reader.
///
/// Running out of input in the middle of the value is a format error.
pub fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let first = reader.read_u8().map_err(truncated)?;
    read_u64_continued(reader, first)
}

/// Read a variable-length encoded u64, or `None` if the reader is already at
/// end of input.
///
/// Only a clean end of input before the first byte yields `None`; end of input
/// after the first byte is still a format error.
pub fn read_u64_or_eof<R: Read>(reader: &mut R) -> Result<Option<u64>> {
    let mut first = [0u8; 1];
    loop {
        match reader.read(&mut first) {
            Ok(0) => return Ok(None),
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    read_u64_continued(reader, first[0]).map(Some)
}

fn read_u64_continued<R: Read>(reader: &mut R, first: u8) -> Result<u64> {
    let mut byte = first;
    let mut result = 0u64;
    let mut shift = 0;

    loop {
        result = accumulate(result, byte, shift)?;

        if (byte & 0x80) == 0 {
            return Ok(result);
        }

        shift += 7;
        byte = reader.read_u8().map_err(truncated)?;
    }
}

fn accumulate(result: u64, byte: u8, shift: u32) -> Result<u64> {
    let payload = (byte & 0x7F) as u64;
    // The tenth byte may only carry the single top bit.
    if shift >= 64 || (shift == 63 && payload > 1) {
        return Err(QuillError::format("varint overflow"));
    }
    Ok(result | (payload << shift))
}

fn truncated(err: io::Error) -> QuillError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        QuillError::format("truncated varint")
    } else {
        err.into()
    }
}
