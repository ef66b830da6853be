//! Event tags and payload shapes.
//!
//! The protocol surface is small and closed: one client->server event and one
//! server->client event. Both directions get a tagged enum so the router and
//! the session can match on shapes instead of strings.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChatError, Result};
use crate::protocol::envelope::{cast_payload, encode, Envelope};

/// client -> server
pub const SEND_MESSAGE: &str = "send_message";
/// server -> client
pub const NEW_MESSAGE: &str = "new_message";

/// Outbound chat content plus the sender's display identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessagePayload {
    pub message: String,
    pub from: String,
}

impl SendMessagePayload {
    /// Trim `raw` and build a payload; `None` when nothing is left to send.
    pub fn compose(raw: &str, from: &str) -> Option<Self> {
        let message = raw.trim();
        if message.is_empty() {
            return None;
        }
        Some(Self {
            message: message.to_owned(),
            from: from.to_owned(),
        })
    }
}

/// Inbound echo of a chat message.
///
/// `sent` is server-defined and only ever displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NewMessageWire")]
pub struct NewMessagePayload {
    #[serde(rename = "sendMessage")]
    pub send_message: SendMessagePayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent: Option<Value>,
}

// Servers that embed the send payload into the broadcast struct emit the
// flattened form `{message, from, sent}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum NewMessageWire {
    Nested {
        #[serde(rename = "sendMessage")]
        send_message: SendMessagePayload,
        #[serde(default)]
        sent: Option<Value>,
    },
    Flat {
        message: String,
        from: String,
        #[serde(default)]
        sent: Option<Value>,
    },
}

impl From<NewMessageWire> for NewMessagePayload {
    fn from(w: NewMessageWire) -> Self {
        match w {
            NewMessageWire::Nested { send_message, sent } => Self { send_message, sent },
            NewMessageWire::Flat {
                message,
                from,
                sent,
            } => Self {
                send_message: SendMessagePayload { message, from },
                sent,
            },
        }
    }
}

impl NewMessagePayload {
    pub fn sender(&self) -> &str {
        &self.send_message.from
    }

    pub fn message(&self) -> &str {
        &self.send_message.message
    }

    /// Server-provided `sent` rendered for display, if there is one.
    pub fn sent_display(&self) -> Option<String> {
        match self.sent.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Known server -> client events.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    NewMessage(NewMessagePayload),
}

impl ServerEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            ServerEvent::NewMessage(_) => NEW_MESSAGE,
        }
    }

    /// Resolve an inbound envelope into a known event with a checked coerce.
    pub fn resolve(env: &Envelope) -> Result<Self> {
        match env.event_type.as_str() {
            "" => Err(ChatError::EmptyEventType),
            NEW_MESSAGE => cast_payload(env.payload()).map(ServerEvent::NewMessage),
            other => Err(ChatError::UnsupportedEventType(other.to_owned())),
        }
    }
}

/// Known client -> server events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    SendMessage(SendMessagePayload),
}

impl ClientEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            ClientEvent::SendMessage(_) => SEND_MESSAGE,
        }
    }

    pub fn encode(&self) -> Result<Bytes> {
        match self {
            ClientEvent::SendMessage(p) => encode(self.event_type(), p),
        }
    }
}
