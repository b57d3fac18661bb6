//! Minecraft connection-entry protocol for Basalt.
//!
//! This crate frames raw byte streams into packets, decodes typed fields
//! with a signature-driven codec, and walks each client connection through
//! Handshake into Status or Login.

pub mod codec;
pub mod conn;
pub mod error;
pub mod fields;
pub mod frame;
pub mod stage;
pub mod status;
pub mod varint;

pub use conn::Connection;
pub use error::ProtocolError;
pub use stage::Stage;
pub use status::StatusPayload;
