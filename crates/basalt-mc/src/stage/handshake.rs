//! Handshake stage: the first packet decides where the connection goes.

use tracing::debug;

use crate::error::{ProtocolError, Result};
use crate::fields::{FieldType, FieldValue};
use crate::stage::{HandlerCtx, Outcome, PacketDef, Stage};

/// Next-state selector for the status phase.
const NEXT_STATE_STATUS: i32 = 1;

/// Next-state selector for the login phase.
const NEXT_STATE_LOGIN: i32 = 2;

/// Handshake packet registry.
pub static REGISTRY: &[PacketDef] = &[PacketDef {
    id: 0,
    signature: &[
        FieldType::VarInt,
        FieldType::String,
        FieldType::UShort,
        FieldType::VarInt,
    ],
    handler: on_handshake,
}];

/// Handle the handshake packet (id 0).
///
/// The protocol version, server address, and port are accepted without
/// validation; only the next-state field is acted on.
fn on_handshake(_ctx: &HandlerCtx<'_>, fields: &[FieldValue]) -> Result<Outcome> {
    let [FieldValue::VarInt(protocol_version), FieldValue::String(server_address), FieldValue::UShort(server_port), FieldValue::VarInt(next_state)] =
        fields
    else {
        return Err(ProtocolError::MalformedField("handshake"));
    };

    debug!(
        protocol = protocol_version,
        address = %server_address,
        port = server_port,
        next_state,
        "received handshake"
    );

    match *next_state {
        NEXT_STATE_STATUS => Ok(Outcome::transition(Stage::Status)),
        NEXT_STATE_LOGIN => Ok(Outcome::transition(Stage::Login)),
        other => Err(ProtocolError::UnsupportedNextState(other)),
    }
}
