//! `VarInt` encoding/decoding for the Minecraft protocol.
//!
//! A `VarInt` carries 7 bits of data per byte, low-order group first, with
//! the high bit set on every byte except the last. Decoding accumulates the
//! groups into an unsigned 32-bit value and reinterprets it as signed
//! two's-complement, so negative numbers always occupy 5 bytes.

use bytes::{Buf, BufMut};

use crate::error::{ProtocolError, Result};

/// Segment bits mask (lower 7 bits).
const SEGMENT_BITS: u8 = 0x7F;

/// Continue bit (high bit).
const CONTINUE_BIT: u8 = 0x80;

/// Read a `VarInt` from a buffer.
///
/// There is no cap on the number of continuation bytes: groups past the
/// 32-bit accumulator are discarded, and the only failure mode is running
/// out of bytes before a terminating byte is seen.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedField`] if the buffer is exhausted
/// before the final byte of the `VarInt`.
#[allow(clippy::cast_possible_wrap)]
pub fn read_varint(buf: &mut impl Buf) -> Result<i32> {
    let mut acc: u32 = 0;
    let mut shift: u32 = 0;

    loop {
        if !buf.has_remaining() {
            return Err(ProtocolError::MalformedField("varint"));
        }
        let byte = buf.get_u8();

        if shift < 32 {
            acc |= u32::from(byte & SEGMENT_BITS) << shift;
        }

        if byte & CONTINUE_BIT == 0 {
            break;
        }

        shift += 7;
    }

    Ok(acc as i32)
}

/// Write a `VarInt` to a buffer.
///
/// Returns the number of bytes written.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub fn write_varint(buf: &mut impl BufMut, mut value: i32) -> usize {
    let mut bytes_written = 0;

    loop {
        #[allow(clippy::cast_possible_truncation)]
        let mut byte = (value & i32::from(SEGMENT_BITS)) as u8;
        value = ((value as u32) >> 7) as i32;

        if value != 0 {
            byte |= CONTINUE_BIT;
        }

        buf.put_u8(byte);
        bytes_written += 1;

        if value == 0 {
            break;
        }
    }

    bytes_written
}

/// Calculate the number of bytes needed to encode a `VarInt`.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn varint_len(value: i32) -> usize {
    // Convert to unsigned for bit manipulation
    let value = value as u32;

    if value == 0 {
        return 1;
    }

    let bits_needed = 32 - value.leading_zeros();
    (bits_needed as usize).div_ceil(7)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: i32) {
        let mut buf = Vec::new();
        let written = write_varint(&mut buf, value);
        assert_eq!(written, buf.len());
        assert_eq!(buf.len(), varint_len(value));

        let mut slice = &buf[..];
        let read_value = read_varint(&mut slice).unwrap();
        assert_eq!(read_value, value);
        assert!(slice.is_empty());
    }

    #[test]
    fn test_varint_roundtrip() {
        for value in [0, 1, 127, 128, 255, 25565, i32::MAX, -1, i32::MIN] {
            roundtrip(value);
        }
    }

    #[test]
    fn test_known_values() {
        // Test vectors from wiki.vg
        let test_cases = [
            (0, vec![0x00]),
            (1, vec![0x01]),
            (127, vec![0x7f]),
            (128, vec![0x80, 0x01]),
            (255, vec![0xff, 0x01]),
            (25565, vec![0xdd, 0xc7, 0x01]),
            (2_097_151, vec![0xff, 0xff, 0x7f]),
            (2_147_483_647, vec![0xff, 0xff, 0xff, 0xff, 0x07]),
            (-1, vec![0xff, 0xff, 0xff, 0xff, 0x0f]),
            (-2_147_483_648, vec![0x80, 0x80, 0x80, 0x80, 0x08]),
        ];

        for (value, expected_bytes) in test_cases {
            let mut buf = Vec::new();
            write_varint(&mut buf, value);
            assert_eq!(buf, expected_bytes, "write failed for {value}");

            let mut slice = &expected_bytes[..];
            let read_value = read_varint(&mut slice).unwrap();
            assert_eq!(read_value, value, "read failed for {value}");
        }
    }

    #[test]
    fn test_varint_len() {
        assert_eq!(varint_len(0), 1);
        assert_eq!(varint_len(127), 1);
        assert_eq!(varint_len(128), 2);
        assert_eq!(varint_len(16383), 2);
        assert_eq!(varint_len(16384), 3);
        assert_eq!(varint_len(i32::MAX), 5);
        // Negative numbers always use 5 bytes
        assert_eq!(varint_len(-1), 5);
        assert_eq!(varint_len(i32::MIN), 5);
    }

    #[test]
    fn test_truncated_varint() {
        // All bytes have the continue bit set, so the buffer runs dry
        let bytes: &[u8] = &[0x80, 0x80, 0x80];
        let mut slice = bytes;
        let result = read_varint(&mut slice);
        assert!(matches!(result, Err(ProtocolError::MalformedField("varint"))));
    }

    #[test]
    fn test_empty_buffer() {
        let mut slice: &[u8] = &[];
        assert!(read_varint(&mut slice).is_err());
    }
}
