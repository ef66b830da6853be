//! Protocol modules (envelope codec + event shapes).
//!
//! - `envelope`: the generic `{type, payload}` JSON frame and its codec.
//! - `events`: the closed set of payload shapes and their type tags.
//!
//! Decoding is panic-free: malformed input is reported as `ChatError`
//! so one bad frame never takes the connection down.

pub mod envelope;
pub mod events;

pub use envelope::{cast_payload, decode, encode, Envelope};
pub use events::{
    ClientEvent, NewMessagePayload, SendMessagePayload, ServerEvent, NEW_MESSAGE, SEND_MESSAGE,
};
