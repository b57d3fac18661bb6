//! Per-client connection state and the frame dispatch loop.

use std::sync::Arc;

use bytes::{Buf, Bytes};
use tracing::debug;

use crate::error::Result;
use crate::stage::{HandlerCtx, Stage};
use crate::status::StatusPayload;
use crate::varint::read_varint;

/// State for one accepted transport: the active stage plus a shared,
/// read-only reference to the status payload.
///
/// Created with [`Stage::Handshake`] active; the handshake handler replaces
/// the stage exactly once, and the connection is dropped when the transport
/// closes. Nothing here is shared between connections except the payload.
pub struct Connection {
    stage: Stage,
    status: Arc<StatusPayload>,
}

impl Connection {
    /// Create a connection in the handshake stage.
    #[must_use]
    pub const fn new(status: Arc<StatusPayload>) -> Self {
        Self {
            stage: Stage::Handshake,
            status,
        }
    }

    /// The currently active stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Dispatch a chunk of inbound bytes against the active stage.
    ///
    /// The chunk may hold several pipelined packets; they are dispatched in
    /// order, each resolved against whatever stage is active when its turn
    /// comes, so a handshake followed by a status request in one chunk
    /// works. Returns the response frames to write back, in order.
    ///
    /// The declared length of each packet is read but not cross-checked
    /// against the bytes its signature consumes; a `Data` field therefore
    /// runs to the end of the chunk. Feeding one whole frame at a time
    /// (see [`FrameBuffer`](crate::frame::FrameBuffer)) bounds it to the
    /// declared frame instead.
    ///
    /// # Errors
    ///
    /// Any error is fatal to this connection: the caller must stop feeding
    /// it and close the transport.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<Bytes>> {
        let mut buf = Bytes::copy_from_slice(chunk);
        let mut responses = Vec::new();

        while buf.has_remaining() {
            let _declared_len = read_varint(&mut buf)?;
            let packet_id = read_varint(&mut buf)?;

            let def = self.stage.lookup(packet_id)?;

            let mut fields = Vec::with_capacity(def.signature.len());
            for field_type in def.signature {
                fields.push(field_type.decode(&mut buf)?);
            }

            debug!(stage = %self.stage, id = packet_id, "dispatching packet");

            let ctx = HandlerCtx {
                status: &self.status,
            };
            let outcome = (def.handler)(&ctx, &fields)?;

            if let Some(response) = outcome.response {
                responses.push(response);
            }
            if let Some(next) = outcome.next_stage {
                debug!(from = %self.stage, to = %next, "stage transition");
                self.stage = next;
            }
        }

        Ok(responses)
    }
}
