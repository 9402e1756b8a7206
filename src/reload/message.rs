//! Live reload message protocol.
//!
//! JSON messages sent from the development server to browser clients:
//!
//! - `reload`: trigger a full page reload
//! - `css`: re-fetch a stylesheet in place (no page reload, no layout flash)
//! - `connected`: handshake greeting with the server version

use serde::{Deserialize, Serialize};

/// Live reload message sent over WebSocket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReloadMessage {
    /// Full page reload
    Reload {
        /// Optional reason for reload
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Stylesheet update (fast path - swap the link href, no reload)
    Css {
        /// Logical stylesheet filename (e.g. `style.css`)
        href: String,
    },

    /// Connection established
    Connected {
        /// Server version for compatibility check
        version: String,
    },
}

impl ReloadMessage {
    /// Create a reload message with reason
    pub fn reload(reason: impl Into<String>) -> Self {
        Self::Reload {
            reason: Some(reason.into()),
        }
    }

    /// Create a stylesheet update message
    pub fn css(href: impl Into<String>) -> Self {
        Self::Css { href: href.into() }
    }

    /// Create a connected message
    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }
}
