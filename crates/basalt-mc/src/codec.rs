//! Checked primitive field reads and writes.
//!
//! Every read verifies that enough bytes remain before consuming them, so
//! a truncated buffer surfaces as [`ProtocolError::MalformedField`] rather
//! than a panic. All fixed-width integers are big-endian.

use bytes::{Buf, BufMut, Bytes};
use uuid::Uuid;

use crate::error::{ProtocolError, Result};
use crate::varint::{read_varint, write_varint};

/// Read a length-prefixed UTF-8 string: `VarInt(byte length) ++ bytes`.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedField`] if the length prefix is
/// negative, the buffer is short, or the bytes are not valid UTF-8.
pub fn read_string(buf: &mut impl Buf) -> Result<String> {
    let len = read_varint(buf)?;
    let len = usize::try_from(len).map_err(|_| ProtocolError::MalformedField("string"))?;

    if buf.remaining() < len {
        return Err(ProtocolError::MalformedField("string"));
    }

    let bytes = buf.copy_to_bytes(len);
    String::from_utf8(bytes.to_vec()).map_err(|_| ProtocolError::MalformedField("string"))
}

/// Write a length-prefixed UTF-8 string.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn write_string(buf: &mut impl BufMut, s: &str) {
    let bytes = s.as_bytes();
    write_varint(buf, bytes.len() as i32);
    buf.put_slice(bytes);
}

/// Read a big-endian unsigned 16-bit integer.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedField`] on a short read.
pub fn read_ushort(buf: &mut impl Buf) -> Result<u16> {
    if buf.remaining() < 2 {
        return Err(ProtocolError::MalformedField("ushort"));
    }
    Ok(buf.get_u16())
}

/// Write a big-endian unsigned 16-bit integer.
pub fn write_ushort(buf: &mut impl BufMut, value: u16) {
    buf.put_u16(value);
}

/// Read a "long" field.
///
/// On this wire format a long is 4 bytes, big-endian, signed. The name is
/// historical; do not widen it to 8 bytes.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedField`] on a short read.
pub fn read_long(buf: &mut impl Buf) -> Result<i32> {
    if buf.remaining() < 4 {
        return Err(ProtocolError::MalformedField("long"));
    }
    Ok(buf.get_i32())
}

/// Write a 4-byte big-endian signed "long" field.
pub fn write_long(buf: &mut impl BufMut, value: i32) {
    buf.put_i32(value);
}

/// Read a UUID as 16 raw bytes, no byte-order transform.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedField`] on a short read.
pub fn read_uuid(buf: &mut impl Buf) -> Result<Uuid> {
    if buf.remaining() < 16 {
        return Err(ProtocolError::MalformedField("uuid"));
    }
    let mut bytes = [0u8; 16];
    buf.copy_to_slice(&mut bytes);
    Ok(Uuid::from_bytes(bytes))
}

/// Write a UUID as 16 raw bytes.
pub fn write_uuid(buf: &mut impl BufMut, uuid: Uuid) {
    buf.put_slice(uuid.as_bytes());
}

/// Read a `VarInt`-length-prefixed byte array.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedField`] if the length prefix is
/// negative or the buffer is short.
pub fn read_byte_array(buf: &mut impl Buf) -> Result<Bytes> {
    let len = read_varint(buf)?;
    let len = usize::try_from(len).map_err(|_| ProtocolError::MalformedField("byte array"))?;

    if buf.remaining() < len {
        return Err(ProtocolError::MalformedField("byte array"));
    }

    Ok(buf.copy_to_bytes(len))
}

/// Write a `VarInt`-length-prefixed byte array.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn write_byte_array(buf: &mut impl BufMut, data: &[u8]) {
    write_varint(buf, data.len() as i32);
    buf.put_slice(data);
}

/// Read a raw data tail: every byte left in the buffer, no length prefix.
pub fn read_data(buf: &mut impl Buf) -> Bytes {
    buf.copy_to_bytes(buf.remaining())
}
