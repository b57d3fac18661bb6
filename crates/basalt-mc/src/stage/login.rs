//! Login stage.
//!
//! Only the login start packet is handled, and deliberately as a stub: the
//! name and UUID are decoded and logged, but no encryption request, login
//! success, or compression notice is sent. Extending the exchange beyond
//! this point is a separate feature, not a fix.

use tracing::debug;

use crate::error::{ProtocolError, Result};
use crate::fields::{FieldType, FieldValue};
use crate::stage::{HandlerCtx, Outcome, PacketDef};

/// Login stage packet registry.
pub static REGISTRY: &[PacketDef] = &[PacketDef {
    id: 0,
    signature: &[FieldType::String, FieldType::Uuid],
    handler: on_login_start,
}];

/// Handle a login start packet (id 0): accept, decode, no response.
fn on_login_start(_ctx: &HandlerCtx<'_>, fields: &[FieldValue]) -> Result<Outcome> {
    let [FieldValue::String(name), FieldValue::Uuid(player_id)] = fields else {
        return Err(ProtocolError::MalformedField("login start"));
    };

    debug!(player = %name, uuid = %player_id, "login start");
    Ok(Outcome::none())
}
