//! Unsigned LEB128 varints, as used by the Sponge `BlockData` array.
//!
//! 7 payload bits per byte, low bits first, continuation flagged in the high
//! bit. A single value never spans more than 5 bytes.

use crate::error::FormatError;

pub const MAX_VARINT_BYTES: usize = 5;

/// Decodes one value starting at `*pos`, advancing `*pos` past it.
pub fn read_varint(data: &[u8], pos: &mut usize) -> Result<u32, FormatError> {
    let mut value: u32 = 0;
    let mut consumed = 0;

    loop {
        let byte = *data.get(*pos).ok_or(FormatError::TruncatedVarint)?;
        value |= u32::from(byte & 0x7F) << (consumed * 7);
        consumed += 1;
        *pos += 1;

        if byte & 0x80 == 0 {
            return Ok(value);
        }
        if consumed >= MAX_VARINT_BYTES {
            return Err(FormatError::VarintTooLong);
        }
    }
}

/// Decodes an entire varint stream.
pub fn decode_stream(data: &[u8]) -> Result<Vec<u32>, FormatError> {
    let mut values = Vec::with_capacity(data.len());
    let mut pos = 0;
    while pos < data.len() {
        values.push(read_varint(data, &mut pos)?);
    }
    Ok(values)
}

/// Appends the LEB128 encoding of `value` to `buf`.
pub fn write_varint(buf: &mut Vec<u8>, mut value: u32) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}
