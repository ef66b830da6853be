//! Decode-once codec between WebSocket frames and envelopes.
//!
//! - Text and binary frames => `Envelope` (lazy `RawValue` payload)
//! - Ping/Pong are transport-internal (tungstenite answers pings itself)
//! - Close is surfaced so the connection can end

use bytes::Bytes;
use tokio_tungstenite::tungstenite::Message;

use otpchat_core::{error::Result, protocol};

#[derive(Debug)]
pub enum Inbound {
    Envelope(protocol::Envelope),
    Control,
    Close,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Text(s) => Ok(Inbound::Envelope(protocol::decode(s.as_bytes())?)),
        Message::Binary(b) => Ok(Inbound::Envelope(protocol::decode(&b)?)),
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Ok(Inbound::Control),
        Message::Close(_) => Ok(Inbound::Close),
    }
}

/// Encoded envelopes go out as text frames; non-UTF-8 falls back to binary.
pub fn encode(bytes: Bytes) -> Message {
    match std::str::from_utf8(&bytes) {
        Ok(s) => Message::Text(s.to_owned()),
        Err(_) => Message::Binary(bytes.to_vec()),
    }
}
