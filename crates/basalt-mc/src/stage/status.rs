//! Status stage: server list ping.
//!
//! Packet 0 answers with the JSON status payload, packet 1 echoes an opaque
//! ping token back under the same id.

use bytes::BytesMut;
use tracing::debug;

use crate::codec::write_string;
use crate::error::{ProtocolError, Result};
use crate::fields::{FieldType, FieldValue};
use crate::frame::write_frame;
use crate::stage::{HandlerCtx, Outcome, PacketDef};

/// Status stage packet registry.
pub static REGISTRY: &[PacketDef] = &[
    PacketDef {
        id: 0,
        signature: &[],
        handler: on_status_request,
    },
    PacketDef {
        id: 1,
        signature: &[FieldType::Data],
        handler: on_ping_request,
    },
];

/// Handle a status request (id 0, no fields).
///
/// The response body is the status JSON as a length-prefixed string under
/// packet id 0, wrapped in the usual outer length prefix.
fn on_status_request(ctx: &HandlerCtx<'_>, _fields: &[FieldValue]) -> Result<Outcome> {
    let json = ctx.status.to_json();

    let mut payload = BytesMut::new();
    write_string(&mut payload, &json);

    debug!(bytes = json.len(), "answering status request");
    Ok(Outcome::respond(write_frame(0, &payload)))
}

/// Handle a ping request (id 1, opaque data tail).
///
/// The token is conventionally 8 bytes but is echoed back verbatim
/// whatever its size.
fn on_ping_request(_ctx: &HandlerCtx<'_>, fields: &[FieldValue]) -> Result<Outcome> {
    let [FieldValue::Data(token)] = fields else {
        return Err(ProtocolError::MalformedField("ping"));
    };

    debug!(bytes = token.len(), "echoing ping");
    Ok(Outcome::respond(write_frame(1, token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::read_string;
    use crate::status::StatusPayload;
    use crate::varint::read_varint;
    use bytes::{Buf, Bytes};
    use serde_json::Value;

    #[test]
    fn test_status_response_layout() {
        let status = StatusPayload::new("1.20.4", 765).with_motd("Hello world");
        let ctx = HandlerCtx { status: &status };

        let outcome = on_status_request(&ctx, &[]).unwrap();
        let mut frame = outcome.response.unwrap();

        // Outer length covers exactly the rest of the frame
        let declared = read_varint(&mut frame).unwrap();
        assert_eq!(usize::try_from(declared).unwrap(), frame.remaining());

        let packet_id = read_varint(&mut frame).unwrap();
        assert_eq!(packet_id, 0);

        let json = read_string(&mut frame).unwrap();
        assert!(frame.is_empty());

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["description"]["text"], "Hello world");
        assert_eq!(value["version"]["protocol"], 765);
    }

    #[test]
    fn test_ping_echo() {
        let status = StatusPayload::new("1.20.4", 765);
        let ctx = HandlerCtx { status: &status };
        let token = Bytes::from_static(&[0, 0, 0, 0, 0x4D, 0x88, 0x2B, 0x9E]);

        let fields = [FieldValue::Data(token.clone())];
        let outcome = on_ping_request(&ctx, &fields).unwrap();
        let mut frame = outcome.response.unwrap();

        let declared = read_varint(&mut frame).unwrap();
        assert_eq!(declared, i32::try_from(token.len()).unwrap() + 1);
        assert_eq!(read_varint(&mut frame).unwrap(), 1);
        assert_eq!(frame, token);
    }

    #[test]
    fn test_ping_echo_empty_token() {
        let status = StatusPayload::new("1.20.4", 765);
        let ctx = HandlerCtx { status: &status };

        let fields = [FieldValue::Data(Bytes::new())];
        let outcome = on_ping_request(&ctx, &fields).unwrap();
        assert_eq!(&outcome.response.unwrap()[..], &[0x01, 0x01]);
    }
}
