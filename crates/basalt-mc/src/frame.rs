//! Packet framing: `[VarInt length][VarInt packet_id][payload...]`.
//!
//! The length covers the packet id and payload, but not itself. This module
//! builds outbound frames and reassembles inbound ones from arbitrarily
//! split transport reads.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ProtocolError, Result};
use crate::varint::{varint_len, write_varint};

/// Maximum packet size (2 MiB, same as vanilla).
pub const MAX_PACKET_SIZE: usize = 2 * 1024 * 1024;

/// Segment bits mask (lower 7 bits).
const SEGMENT_BITS: u8 = 0x7F;

/// Continue bit (high bit).
const CONTINUE_BIT: u8 = 0x80;

/// Build a complete outbound frame for `id` and `payload`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn write_frame(id: i32, payload: &[u8]) -> Bytes {
    let body_len = varint_len(id) + payload.len();
    let body_len_i32 = body_len as i32;

    let mut buf = BytesMut::with_capacity(varint_len(body_len_i32) + body_len);
    write_varint(&mut buf, body_len_i32);
    write_varint(&mut buf, id);
    buf.put_slice(payload);
    buf.freeze()
}

/// Accumulates transport reads and releases whole frames.
///
/// Real transports split and coalesce packets arbitrarily, so bytes are
/// buffered here until a full length-prefixed frame is present. Each
/// released frame still carries its length prefix, ready for
/// [`Connection::feed`](crate::conn::Connection::feed).
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: BytesMut,
}

impl FrameBuffer {
    /// Create an empty frame buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of bytes read from the transport.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Number of buffered bytes not yet released as frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether no bytes are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Take the next complete frame, if one has fully arrived.
    ///
    /// Returns `Ok(None)` when more bytes are needed.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedField`] if the length prefix
    /// decodes to a negative value, or [`ProtocolError::PacketTooLong`]
    /// if it exceeds [`MAX_PACKET_SIZE`]. Oversized lengths are rejected
    /// as soon as the prefix is readable, before any body bytes arrive.
    #[allow(clippy::cast_possible_wrap)]
    pub fn next_frame(&mut self) -> Result<Option<Bytes>> {
        // Peek the length VarInt without consuming it
        let mut acc: u32 = 0;
        let mut shift: u32 = 0;
        let mut prefix_len = 0;

        loop {
            let Some(&byte) = self.buf.get(prefix_len) else {
                return Ok(None);
            };
            if shift < 32 {
                acc |= u32::from(byte & SEGMENT_BITS) << shift;
            }
            prefix_len += 1;

            if byte & CONTINUE_BIT == 0 {
                break;
            }
            shift += 7;
        }

        let body_len = usize::try_from(acc as i32)
            .map_err(|_| ProtocolError::MalformedField("packet length"))?;

        if body_len > MAX_PACKET_SIZE {
            return Err(ProtocolError::PacketTooLong {
                len: body_len,
                max: MAX_PACKET_SIZE,
            });
        }

        if self.buf.len() < prefix_len + body_len {
            return Ok(None);
        }

        Ok(Some(self.buf.split_to(prefix_len + body_len).freeze()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_frame_layout() {
        let frame = write_frame(1, &[0xAA, 0xBB]);
        // length = varint_len(1) + 2 = 3
        assert_eq!(&frame[..], &[0x03, 0x01, 0xAA, 0xBB]);
    }

    #[test]
    fn test_write_frame_empty_payload() {
        let frame = write_frame(0, &[]);
        assert_eq!(&frame[..], &[0x01, 0x00]);
    }

    #[test]
    fn test_whole_frame_released() {
        let mut frames = FrameBuffer::new();
        frames.extend(&[0x03, 0x00, 0x01, 0x02]);

        let frame = frames.next_frame().unwrap().unwrap();
        assert_eq!(&frame[..], &[0x03, 0x00, 0x01, 0x02]);
        assert!(frames.is_empty());
        assert!(frames.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_partial_frame_held_back() {
        let mut frames = FrameBuffer::new();
        frames.extend(&[0x05, 0x00]);
        assert!(frames.next_frame().unwrap().is_none());
        assert_eq!(frames.len(), 2);

        frames.extend(&[0x01, 0x02, 0x03]);
        assert!(frames.next_frame().unwrap().is_none());

        frames.extend(&[0x04]);
        let frame = frames.next_frame().unwrap().unwrap();
        assert_eq!(&frame[..], &[0x05, 0x00, 0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_split_length_prefix() {
        let payload = vec![0u8; 200];
        let frame = write_frame(0, &payload);
        // 201-byte body needs a two-byte length prefix
        assert_ne!(frame[0] & CONTINUE_BIT, 0);

        let mut frames = FrameBuffer::new();
        // Deliver the first byte of a multi-byte length prefix alone
        frames.extend(&frame[..1]);
        assert!(frames.next_frame().unwrap().is_none());

        frames.extend(&frame[1..]);
        let released = frames.next_frame().unwrap().unwrap();
        assert_eq!(released, frame);
    }

    #[test]
    fn test_pipelined_frames_in_order() {
        let first = write_frame(0, &[0x0A]);
        let second = write_frame(1, &[0x0B, 0x0C]);

        let mut frames = FrameBuffer::new();
        let mut combined = first.to_vec();
        combined.extend_from_slice(&second);
        frames.extend(&combined);

        assert_eq!(frames.next_frame().unwrap().unwrap(), first);
        assert_eq!(frames.next_frame().unwrap().unwrap(), second);
        assert!(frames.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_oversized_declared_length_is_fatal() {
        let mut frames = FrameBuffer::new();
        // VarInt i32::MAX as a length prefix, with filler trailing it
        frames.extend(&[0xFF, 0xFF, 0xFF, 0xFF, 0x07]);
        frames.extend(&[0u8; 1024]);

        // Rejected outright instead of waiting for 2 GiB to accumulate
        assert!(matches!(
            frames.next_frame(),
            Err(ProtocolError::PacketTooLong {
                len: 0x7FFF_FFFF,
                max: MAX_PACKET_SIZE
            })
        ));
    }

    #[test]
    fn test_max_size_frame_accepted() {
        let payload = vec![0u8; MAX_PACKET_SIZE - 1];
        let frame = write_frame(0, &payload);

        let mut frames = FrameBuffer::new();
        frames.extend(&frame);
        assert_eq!(frames.next_frame().unwrap().unwrap(), frame);
    }

    #[test]
    fn test_negative_length_is_fatal() {
        let mut frames = FrameBuffer::new();
        // VarInt -1 as a length prefix
        frames.extend(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
        assert!(matches!(
            frames.next_frame(),
            Err(ProtocolError::MalformedField("packet length"))
        ));
    }
}
