//! Connection stages and their packet registries.
//!
//! A stage is a named phase of the connection with an immutable table
//! mapping packet ids to a handler and an ordered field signature. The
//! tables are plain statics populated at compile time, so every registry
//! exists before the first connection is accepted.

use std::fmt;

use bytes::Bytes;

use crate::error::{ProtocolError, Result};
use crate::fields::{FieldType, FieldValue};
use crate::status::StatusPayload;

pub mod handshake;
pub mod login;
pub mod status;

/// A connection phase: Handshake is initial, Status and Login terminal.
///
/// The only legal transition is Handshake to Status or Login, driven by the
/// handshake packet. A full server would continue from Login into Play;
/// that phase is outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Initial phase; decides where the connection goes next.
    Handshake,
    /// Server list ping phase.
    Status,
    /// Login phase.
    Login,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handshake => f.write_str("handshake"),
            Self::Status => f.write_str("status"),
            Self::Login => f.write_str("login"),
        }
    }
}

/// Read-only context handed to packet handlers.
pub struct HandlerCtx<'a> {
    /// The process-wide status payload.
    pub status: &'a StatusPayload,
}

/// What a handler asks the connection to do after a packet.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Frame to write back to the transport, if any.
    pub response: Option<Bytes>,
    /// Stage to activate for subsequent packets, if any.
    pub next_stage: Option<Stage>,
}

impl Outcome {
    /// No response, no transition.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Write `frame` back to the transport.
    #[must_use]
    pub const fn respond(frame: Bytes) -> Self {
        Self {
            response: Some(frame),
            next_stage: None,
        }
    }

    /// Replace the active stage.
    #[must_use]
    pub const fn transition(stage: Stage) -> Self {
        Self {
            response: None,
            next_stage: Some(stage),
        }
    }
}

/// A packet handler: decoded fields in, outcome out.
pub type Handler = fn(&HandlerCtx<'_>, &[FieldValue]) -> Result<Outcome>;

/// One entry in a stage's packet registry.
pub struct PacketDef {
    /// Packet id, unique within the stage.
    pub id: i32,
    /// Wire-order field signature.
    pub signature: &'static [FieldType],
    /// Handler invoked with the decoded fields.
    pub handler: Handler,
}

impl Stage {
    /// The immutable packet registry for this stage.
    #[must_use]
    pub fn registry(self) -> &'static [PacketDef] {
        match self {
            Self::Handshake => handshake::REGISTRY,
            Self::Status => status::REGISTRY,
            Self::Login => login::REGISTRY,
        }
    }

    /// Look up the registry entry for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownPacketId`] if the id is not
    /// registered in this stage.
    pub fn lookup(self, id: i32) -> Result<&'static PacketDef> {
        self.registry()
            .iter()
            .find(|def| def.id == id)
            .ok_or(ProtocolError::UnknownPacketId { stage: self, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_catalogue() {
        let ids = |stage: Stage| -> Vec<i32> { stage.registry().iter().map(|d| d.id).collect() };

        assert_eq!(ids(Stage::Handshake), vec![0]);
        assert_eq!(ids(Stage::Status), vec![0, 1]);
        assert_eq!(ids(Stage::Login), vec![0]);
    }

    #[test]
    fn test_packet_ids_unique_within_stage() {
        for stage in [Stage::Handshake, Stage::Status, Stage::Login] {
            let registry = stage.registry();
            for (i, def) in registry.iter().enumerate() {
                assert!(
                    registry[i + 1..].iter().all(|other| other.id != def.id),
                    "duplicate packet id {} in {stage} stage",
                    def.id
                );
            }
        }
    }

    #[test]
    fn test_lookup_unknown_id() {
        let result = Stage::Status.lookup(99);
        assert!(matches!(
            result,
            Err(ProtocolError::UnknownPacketId {
                stage: Stage::Status,
                id: 99
            })
        ));
    }

    #[test]
    fn test_signatures_match_wire_catalogue() {
        assert_eq!(
            Stage::Handshake.lookup(0).unwrap().signature,
            &[
                FieldType::VarInt,
                FieldType::String,
                FieldType::UShort,
                FieldType::VarInt
            ]
        );
        assert_eq!(Stage::Status.lookup(0).unwrap().signature, &[] as &[FieldType]);
        assert_eq!(Stage::Status.lookup(1).unwrap().signature, &[FieldType::Data]);
        assert_eq!(
            Stage::Login.lookup(0).unwrap().signature,
            &[FieldType::String, FieldType::Uuid]
        );
    }
}
