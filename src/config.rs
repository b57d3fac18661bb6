//! Server configuration from environment variables.
//!
//! Everything that feeds the status payload is resolved once at startup;
//! the payload is immutable from then on.

use std::env;
use std::fs;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use basalt_mc::StatusPayload;

use crate::utils::{EnvError, env_bool, env_str, env_u32};

/// Resolved server configuration.
pub struct Config {
    /// Address to listen on.
    pub listen_addr: String,
    /// The status payload shared by all connections.
    pub status: StatusPayload,
}

impl Config {
    /// Build the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds an invalid value, or if the
    /// favicon file cannot be read.
    pub fn from_env() -> Result<Self, EnvError> {
        let listen_addr = env_str("ADDR", "0.0.0.0:25565")?;

        let mut status = StatusPayload::new(
            env_str("VERSION_NAME", "1.20.4")?,
            env_u32("PROTOCOL_VERSION", 765)?,
        )
        .with_motd(env_str("MOTD", "A Basalt Server")?)
        .with_max_players(env_u32("MAX_PLAYERS", 100)?)
        .with_online_players(env_u32("ONLINE_PLAYERS", 0)?)
        .with_chat_flags(
            env_bool("ENFORCES_SECURE_CHAT", false)?,
            env_bool("PREVIEWS_CHAT", false)?,
        );

        match env::var("FAVICON") {
            Ok(path) => status = status.with_favicon(load_favicon(&path)?),
            Err(env::VarError::NotPresent) => {}
            Err(e) => return Err(format!("FAVICON: {e}").into()),
        }

        Ok(Self {
            listen_addr,
            status,
        })
    }
}

/// Read a PNG from disk and wrap it in a base64 data URI.
fn load_favicon(path: &str) -> Result<String, EnvError> {
    let bytes = fs::read(path).map_err(|e| format!("FAVICON: {path}: {e}"))?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
}
