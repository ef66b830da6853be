use std::sync::Arc;

use chrono::Local;

use otpchat_core::error::Result;
use otpchat_core::protocol::{NewMessagePayload, ServerEvent, NEW_MESSAGE};

use crate::dispatch::EventHandler;
use crate::ui::ChatUi;

/// Routes `new_message` to the UI's display callback.
pub struct NewMessageHandler {
    ui: Arc<dyn ChatUi>,
}

impl NewMessageHandler {
    pub fn new(ui: Arc<dyn ChatUi>) -> Self {
        Self { ui }
    }
}

impl EventHandler for NewMessageHandler {
    fn event_type(&self) -> &'static str {
        NEW_MESSAGE
    }

    fn handle(&self, event: ServerEvent) -> Result<()> {
        match event {
            ServerEvent::NewMessage(p) => {
                let ts = display_timestamp(&p);
                self.ui.on_new_message(p.sender(), p.message(), &ts);
                Ok(())
            }
        }
    }
}

/// Server `sent` if present, otherwise local receipt time.
fn display_timestamp(p: &NewMessagePayload) -> String {
    p.sent_display()
        .unwrap_or_else(|| Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
}
