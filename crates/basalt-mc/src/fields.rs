//! The closed set of wire field types and their decoded values.
//!
//! A packet's signature is an ordered slice of [`FieldType`] tags; decoding
//! consumes fields from the payload strictly in signature order. Each tag
//! has exactly one encode and one decode path, dispatched here rather than
//! through any runtime type machinery.

use bytes::{Bytes, BytesMut};
use uuid::Uuid;

use crate::codec::{
    read_byte_array, read_data, read_long, read_string, read_ushort, read_uuid, write_byte_array,
    write_long, write_string, write_ushort, write_uuid,
};
use crate::error::Result;
use crate::varint::{read_varint, write_varint};

/// Tag identifying one wire field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Signed 32-bit variable-length integer.
    VarInt,
    /// UTF-8 string, `VarInt` byte-length prefix.
    String,
    /// Big-endian unsigned 16-bit integer.
    UShort,
    /// Big-endian signed 4-byte integer (the name is historical).
    Long,
    /// Every remaining byte of the packet payload, no length prefix.
    Data,
    /// 16 raw bytes.
    Uuid,
    /// Raw bytes with a `VarInt` length prefix.
    ByteArray,
}

/// A decoded field value, tagged to match its [`FieldType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Decoded from [`FieldType::VarInt`].
    VarInt(i32),
    /// Decoded from [`FieldType::String`].
    String(String),
    /// Decoded from [`FieldType::UShort`].
    UShort(u16),
    /// Decoded from [`FieldType::Long`].
    Long(i32),
    /// Decoded from [`FieldType::Data`].
    Data(Bytes),
    /// Decoded from [`FieldType::Uuid`].
    Uuid(Uuid),
    /// Decoded from [`FieldType::ByteArray`].
    ByteArray(Bytes),
}

impl FieldType {
    /// Decode one field of this type from the front of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedField`] if the buffer is short or
    /// the bytes are invalid for the type.
    pub fn decode(self, buf: &mut Bytes) -> Result<FieldValue> {
        match self {
            Self::VarInt => read_varint(buf).map(FieldValue::VarInt),
            Self::String => read_string(buf).map(FieldValue::String),
            Self::UShort => read_ushort(buf).map(FieldValue::UShort),
            Self::Long => read_long(buf).map(FieldValue::Long),
            Self::Data => Ok(FieldValue::Data(read_data(buf))),
            Self::Uuid => read_uuid(buf).map(FieldValue::Uuid),
            Self::ByteArray => read_byte_array(buf).map(FieldValue::ByteArray),
        }
    }
}

impl FieldValue {
    /// Encode this value to the back of `buf`.
    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            Self::VarInt(value) => {
                write_varint(buf, *value);
            }
            Self::String(s) => write_string(buf, s),
            Self::UShort(value) => write_ushort(buf, *value),
            Self::Long(value) => write_long(buf, *value),
            Self::Data(data) => buf.extend_from_slice(data),
            Self::Uuid(uuid) => write_uuid(buf, *uuid),
            Self::ByteArray(data) => write_byte_array(buf, data),
        }
    }

    /// The [`FieldType`] this value was decoded from.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::VarInt(_) => FieldType::VarInt,
            Self::String(_) => FieldType::String,
            Self::UShort(_) => FieldType::UShort,
            Self::Long(_) => FieldType::Long,
            Self::Data(_) => FieldType::Data,
            Self::Uuid(_) => FieldType::Uuid,
            Self::ByteArray(_) => FieldType::ByteArray,
        }
    }
}
