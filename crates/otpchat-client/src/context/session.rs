use otpchat_core::protocol::{ClientEvent, SendMessagePayload};

/// Immutable metadata for a logged-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Display identity attached to outbound messages.
    pub display_name: String,
}

impl SessionContext {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }

    /// Build a `send_message` event, or `None` for blank input.
    pub fn compose(&self, raw: &str) -> Option<ClientEvent> {
        SendMessagePayload::compose(raw, &self.display_name).map(ClientEvent::SendMessage)
    }
}
