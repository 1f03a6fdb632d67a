//! Variable-length Integer Encoding
//!
//! LEB128-style varints with ZigZag for signed values, used by the snapshot
//! format for string lengths and integer columns. Small magnitudes take one
//! byte instead of eight, which matters when a column holds millions of
//! scores clustered near zero.
//!
//! Decoding is fallible: a truncated or overlong encoding yields
//! `Error::InvalidSnapshot` rather than panicking, since the input is a file
//! that may be corrupt.

use bytes::{Buf, BufMut};

use crate::error::{Error, Result};

/// Encode an unsigned integer, 7 bits per byte, high bit as continuation.
pub fn encode_u64(buf: &mut impl BufMut, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.put_u8(byte);
        if value == 0 {
            break;
        }
    }
}

/// Encode a signed integer with ZigZag mapping (0, -1, 1, -2, ... → 0, 1, 2, 3, ...).
pub fn encode_i64(buf: &mut impl BufMut, value: i64) {
    let zigzag = ((value << 1) ^ (value >> 63)) as u64;
    encode_u64(buf, zigzag);
}

/// Decode an unsigned varint.
pub fn decode_u64(buf: &mut impl Buf) -> Result<u64> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    loop {
        if !buf.has_remaining() {
            return Err(Error::InvalidSnapshot("truncated varint".to_string()));
        }
        let byte = buf.get_u8();
        value |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
        if shift >= 64 {
            return Err(Error::InvalidSnapshot("varint too large".to_string()));
        }
    }
}

/// Decode a ZigZag-encoded signed varint.
pub fn decode_i64(buf: &mut impl Buf) -> Result<i64> {
    let zigzag = decode_u64(buf)?;
    let value = (zigzag >> 1) as i64;
    Ok(if zigzag & 1 != 0 { !value } else { value })
}
