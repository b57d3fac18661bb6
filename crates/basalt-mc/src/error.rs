//! Protocol error types.
//!
//! Every variant here is fatal to the connection that produced it: the
//! dispatch loop aborts and the transport is closed. No protocol-level
//! error packet is sent back to the client.

use std::io;

use thiserror::Error;

use crate::stage::Stage;

/// Errors that can occur while framing or decoding protocol data.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An I/O error occurred on the transport.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A field decode ran past the available bytes, or the bytes were
    /// not valid for the field (e.g. a string that is not UTF-8).
    #[error("malformed {0} field")]
    MalformedField(&'static str),

    /// A frame declared a length beyond the accepted maximum.
    #[error("packet too long: {len} bytes (max {max})")]
    PacketTooLong {
        /// The declared length.
        len: usize,
        /// The maximum allowed length.
        max: usize,
    },

    /// The packet id is not registered in the active stage.
    #[error("unknown packet id {id} in {stage} stage")]
    UnknownPacketId {
        /// The stage whose registry was consulted.
        stage: Stage,
        /// The offending packet id.
        id: i32,
    },

    /// A handshake carried a next-state value other than status (1) or
    /// login (2).
    #[error("unsupported next state: {0}")]
    UnsupportedNextState(i32),
}

/// Result type alias using [`ProtocolError`].
pub type Result<T> = std::result::Result<T, ProtocolError>;
