//! UI collaborator seam.
//!
//! The core never reaches into presentation beyond these three callbacks.

use std::io::Write;

pub trait ChatUi: Send + Sync {
    fn on_connected(&self);
    fn on_disconnected(&self);
    fn on_new_message(&self, from: &str, message: &str, timestamp: &str);
}

/// Line-oriented stdout rendering.
#[derive(Debug, Default)]
pub struct TerminalUi;

impl TerminalUi {
    pub fn new() -> Self {
        Self
    }

    pub fn format_message(from: &str, message: &str, timestamp: &str) -> String {
        format!("{timestamp} - {from}: {message}")
    }

    fn line(&self, s: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{s}") {
            tracing::debug!(error = %e, "stdout write failed");
        }
    }
}

impl ChatUi for TerminalUi {
    fn on_connected(&self) {
        self.line("WS: connected");
    }

    fn on_disconnected(&self) {
        self.line("WS: not connected");
    }

    fn on_new_message(&self, from: &str, message: &str, timestamp: &str) {
        self.line(&Self::format_message(from, message, timestamp));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_line_format() {
        assert_eq!(
            TerminalUi::format_message("bob", "hey", "2024-01-01T00:00:00Z"),
            "2024-01-01T00:00:00Z - bob: hey"
        );
    }
}
