//! Built-in event handlers.

pub mod chat;

pub use chat::NewMessageHandler;
