//! Wire envelope (JSON).
//!
//! Every frame on the persistent connection is `{"type": <tag>, "payload": <object>}`.
//! Inbound payloads are kept as `RawValue` until the router has resolved the tag,
//! so an unsupported event never pays for a full parse.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{ChatError, Result};

/// Inbound envelope with an untyped payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// Event tag (field name is `type` in JSON). Missing decodes as empty.
    #[serde(rename = "type", default)]
    pub event_type: String,
    /// Optional payload, stored as raw JSON (lazy parsing).
    #[serde(default)]
    pub payload: Option<Box<RawValue>>,
}

impl Envelope {
    pub fn new(event_type: impl Into<String>, payload: Option<Box<RawValue>>) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }

    pub fn payload(&self) -> Option<&RawValue> {
        self.payload.as_deref()
    }
}

#[derive(Serialize)]
struct OutboundEnvelope<'a, T: Serialize> {
    #[serde(rename = "type")]
    event_type: &'a str,
    payload: &'a T,
}

/// Serialize `payload` under `event_type`.
///
/// An empty tag is refused so nothing untagged ever reaches the wire.
pub fn encode<T: Serialize>(event_type: &str, payload: &T) -> Result<Bytes> {
    if event_type.is_empty() {
        return Err(ChatError::EmptyEventType);
    }
    let out = OutboundEnvelope {
        event_type,
        payload,
    };
    let v = serde_json::to_vec(&out)
        .map_err(|e| ChatError::Internal(format!("envelope encode failed: {e}")))?;
    Ok(Bytes::from(v))
}

/// Parse raw transport data into an envelope with an untyped payload.
pub fn decode(raw: &[u8]) -> Result<Envelope> {
    serde_json::from_slice(raw)
        .map_err(|e| ChatError::MalformedEnvelope(format!("invalid envelope json: {e}")))
}

/// Coerce an untyped payload into `T`.
///
/// Trust boundary: the shape is taken on the server's word. Fields `T` does not
/// name are ignored; a missing payload, missing required fields, or wrong JSON
/// types are rejected as `MalformedEnvelope`. No schema validation beyond what
/// `T`'s `Deserialize` impl checks happens here.
pub fn cast_payload<T: DeserializeOwned>(raw: Option<&RawValue>) -> Result<T> {
    let raw = raw.ok_or_else(|| ChatError::MalformedEnvelope("missing payload".into()))?;
    serde_json::from_str(raw.get())
        .map_err(|e| ChatError::MalformedEnvelope(format!("payload shape mismatch: {e}")))
}
