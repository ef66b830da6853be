//! Transport layer (WebSocket client).
//!
//! Exposes the connection manager that owns the persistent socket and the
//! codec that turns frames into envelopes once, before they reach the router.

pub mod codec;
pub mod connection;

pub use connection::{ConnEvent, ConnState, ConnectionManager};
