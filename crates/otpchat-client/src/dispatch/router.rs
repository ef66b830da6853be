use std::collections::HashMap;
use std::sync::Arc;

use otpchat_core::error::Result;
use otpchat_core::protocol::{Envelope, ServerEvent};

/// Handler for one server -> client event type.
pub trait EventHandler: Send + Sync {
    fn event_type(&self) -> &'static str;
    fn handle(&self, event: ServerEvent) -> Result<()>;
}

/// What `dispatch` did with an envelope. Never an error for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    EmptyType,
    Unsupported(String),
    /// Known tag whose payload did not fit, or the handler itself failed.
    Rejected(String),
}

/// Static mapping from event tag to handler. Immutable once built.
pub struct EventRouter {
    handlers: HashMap<&'static str, Arc<dyn EventHandler>>,
}

#[derive(Default)]
pub struct RouterBuilder {
    handlers: HashMap<&'static str, Arc<dyn EventHandler>>,
}

impl RouterBuilder {
    pub fn register(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let tag = handler.event_type();
        if self.handlers.insert(tag, handler).is_some() {
            tracing::warn!(event_type = tag, "handler replaced");
        }
        self
    }

    pub fn build(self) -> EventRouter {
        EventRouter {
            handlers: self.handlers,
        }
    }
}

impl EventRouter {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    pub fn registered(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    pub fn dispatch(&self, env: Envelope) -> DispatchOutcome {
        let tag = env.event_type.as_str();
        if tag.is_empty() {
            tracing::debug!("no event type specified");
            return DispatchOutcome::EmptyType;
        }

        let Some(handler) = self.handlers.get(tag) else {
            tracing::debug!(event_type = tag, "unsupported event type");
            return DispatchOutcome::Unsupported(tag.to_owned());
        };

        let event = match ServerEvent::resolve(&env) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(event_type = tag, code = e.code().as_str(), error = %e, "payload rejected");
                return DispatchOutcome::Rejected(e.to_string());
            }
        };

        match handler.handle(event) {
            Ok(()) => DispatchOutcome::Handled,
            Err(e) => {
                tracing::warn!(event_type = tag, code = e.code().as_str(), error = %e, "handler failed");
                DispatchOutcome::Rejected(e.to_string())
            }
        }
    }
}
