//! The server status payload returned to clients probing the server list.
//!
//! Built once at process start and shared read-only by every connection's
//! status stage; nothing mutates it after startup.

use serde::Serialize;

/// Server status payload, serialized to JSON for status responses.
#[derive(Debug, Clone, Serialize)]
pub struct StatusPayload {
    /// Protocol version block.
    pub version: Version,
    /// Player counts and sample list.
    pub players: Players,
    /// Server description (MOTD).
    pub description: Description,
    /// Optional `data:image/png;base64,...` icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    /// Whether the server enforces signed chat.
    #[serde(rename = "enforcesSecureChat")]
    pub enforces_secure_chat: bool,
    /// Whether the server previews chat.
    #[serde(rename = "previewsChat")]
    pub previews_chat: bool,
}

/// Version name and protocol number.
#[derive(Debug, Clone, Serialize)]
pub struct Version {
    /// Human-readable version name (e.g. "1.20.4").
    pub name: String,
    /// Numeric protocol version (e.g. 765).
    pub protocol: u32,
}

/// Player counts shown in the server list.
#[derive(Debug, Clone, Serialize)]
pub struct Players {
    /// Maximum player count.
    pub max: u32,
    /// Current online count.
    pub online: u32,
    /// Sample of online players, shown on hover.
    pub sample: Vec<SamplePlayer>,
}

/// One entry in the player sample list.
#[derive(Debug, Clone, Serialize)]
pub struct SamplePlayer {
    /// Player name.
    pub name: String,
    /// Player UUID in hyphenated string form.
    pub id: String,
}

/// Server description text.
#[derive(Debug, Clone, Serialize)]
pub struct Description {
    /// Plain description text.
    pub text: String,
}

impl StatusPayload {
    /// Create a payload with the given version and empty player data.
    #[must_use]
    pub fn new(version_name: impl Into<String>, protocol: u32) -> Self {
        Self {
            version: Version {
                name: version_name.into(),
                protocol,
            },
            players: Players {
                max: 100,
                online: 0,
                sample: Vec::new(),
            },
            description: Description {
                text: "A Basalt Server".to_string(),
            },
            favicon: None,
            enforces_secure_chat: false,
            previews_chat: false,
        }
    }

    /// Set the server description text.
    #[must_use]
    pub fn with_motd(mut self, motd: impl Into<String>) -> Self {
        self.description.text = motd.into();
        self
    }

    /// Set the maximum player count.
    #[must_use]
    pub const fn with_max_players(mut self, max: u32) -> Self {
        self.players.max = max;
        self
    }

    /// Set the online player count.
    #[must_use]
    pub const fn with_online_players(mut self, online: u32) -> Self {
        self.players.online = online;
        self
    }

    /// Add a player to the sample list.
    #[must_use]
    pub fn with_sample_player(mut self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.players.sample.push(SamplePlayer {
            name: name.into(),
            id: id.into(),
        });
        self
    }

    /// Set the favicon data URI.
    #[must_use]
    pub fn with_favicon(mut self, data_uri: impl Into<String>) -> Self {
        self.favicon = Some(data_uri.into());
        self
    }

    /// Set the secure-chat flags.
    #[must_use]
    pub const fn with_chat_flags(mut self, enforces_secure_chat: bool, previews_chat: bool) -> Self {
        self.enforces_secure_chat = enforces_secure_chat;
        self.previews_chat = previews_chat;
        self
    }

    /// Serialize the payload to its JSON wire form.
    #[must_use]
    pub fn to_json(&self) -> String {
        // Serializing a tree of strings, integers, and booleans never fails
        serde_json::to_string(self).unwrap()
    }
}
