//! Session controller.
//!
//! Orchestrates login -> connection -> router, and turns UI actions into
//! wire frames. It holds no state machine of its own beyond delegation:
//! - the connection manager owns the socket and its lifecycle
//! - the router (built once here) owns the tag -> handler mapping
//! - `SessionContext` carries the display identity for outbound messages

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use otpchat_core::auth::Credentials;
use otpchat_core::error::{ChatError, Result};

use crate::config::ServerSection;
use crate::context::SessionContext;
use crate::dispatch::EventRouter;
use crate::login::LoginClient;
use crate::services::NewMessageHandler;
use crate::transport::{ConnEvent, ConnState, ConnectionManager};
use crate::ui::ChatUi;

pub struct SessionController {
    server: ServerSection,
    login: Arc<dyn LoginClient>,
    ui: Arc<dyn ChatUi>,
    router: Arc<EventRouter>,
    conn: ConnectionManager,
    ctx: Option<SessionContext>,
    pump: Option<JoinHandle<()>>,
}

impl SessionController {
    pub fn new(server: ServerSection, login: Arc<dyn LoginClient>, ui: Arc<dyn ChatUi>) -> Self {
        let router = EventRouter::builder()
            .register(Arc::new(NewMessageHandler::new(Arc::clone(&ui))))
            .build();

        Self {
            conn: ConnectionManager::new(server.clone()),
            server,
            login,
            ui,
            router: Arc::new(router),
            ctx: None,
            pump: None,
        }
    }

    /// Log in and open the persistent connection.
    ///
    /// Returns once the handshake has started; use `wait_settled` to learn
    /// whether it succeeded. Any login failure is `LoginFailed` and leaves the
    /// connection untouched.
    pub async fn start_login(&mut self, username: &str, password: &str) -> Result<()> {
        let current = self.conn.state();
        if matches!(current, ConnState::Connecting | ConnState::Open) {
            return Err(ChatError::InvalidState(format!(
                "already {}",
                current.as_str()
            )));
        }

        let creds = Credentials::new(username, password);
        let token = match self.login.login(&creds).await {
            Ok(token) => token,
            Err(e) => {
                let e = match e {
                    ChatError::LoginFailed(_) => e,
                    other => ChatError::LoginFailed(other.to_string()),
                };
                tracing::warn!(code = e.code().as_str(), error = %e, "login failed");
                return Err(e);
            }
        };

        // Closed is terminal for a manager; a fresh login gets a fresh one.
        if current == ConnState::Closed {
            self.conn = ConnectionManager::new(self.server.clone());
        }

        let events = self.conn.open(token)?;
        self.ctx = Some(SessionContext::new(creds.username));
        self.pump = Some(tokio::spawn(pump(
            events,
            Arc::clone(&self.router),
            Arc::clone(&self.ui),
        )));

        tracing::info!(user = %username, "login ok, connecting");
        Ok(())
    }

    /// Send a chat line. Blank input, no session, or a connection that is not
    /// open are all silent no-ops.
    pub fn send_chat_message(&self, raw: &str) -> Result<()> {
        if raw.trim().is_empty() {
            tracing::trace!("blank message suppressed");
            return Ok(());
        }

        let Some(ctx) = &self.ctx else {
            tracing::debug!("no session; message dropped");
            return Ok(());
        };

        let Some(event) = ctx.compose(raw) else {
            return Ok(());
        };

        let bytes = event.encode()?;
        self.conn.send(bytes);
        Ok(())
    }

    pub fn session(&self) -> Option<&SessionContext> {
        self.ctx.as_ref()
    }

    pub fn connection_state(&self) -> ConnState {
        self.conn.state()
    }

    pub async fn wait_settled(&self) -> ConnState {
        self.conn.settled().await
    }

    pub async fn wait_closed(&self) -> ConnState {
        self.conn.closed().await
    }

    /// Wait for the event pump to drain after the connection ended.
    pub async fn finished(&mut self) {
        if let Some(handle) = self.pump.take() {
            if let Err(e) = handle.await {
                tracing::debug!(error = %e, "event pump ended abnormally");
            }
        }
    }
}

async fn pump(
    mut events: mpsc::UnboundedReceiver<ConnEvent>,
    router: Arc<EventRouter>,
    ui: Arc<dyn ChatUi>,
) {
    while let Some(event) = events.recv().await {
        match event {
            ConnEvent::Opened => ui.on_connected(),
            ConnEvent::Envelope(env) => {
                router.dispatch(env);
            }
            ConnEvent::Closed => {
                ui.on_disconnected();
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use otpchat_core::auth::{ConnectionToken, LoginResponse};

    use super::*;

    struct FixedLogin {
        body: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LoginClient for FixedLogin {
        async fn login(&self, _creds: &Credentials) -> Result<ConnectionToken> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let r: LoginResponse = serde_json::from_str(self.body)
                .map_err(|e| ChatError::Internal(e.to_string()))?;
            r.into_token()
        }
    }

    struct NullUi;

    impl ChatUi for NullUi {
        fn on_connected(&self) {}
        fn on_disconnected(&self) {}
        fn on_new_message(&self, _from: &str, _message: &str, _timestamp: &str) {}
    }

    fn controller(body: &'static str) -> (SessionController, Arc<FixedLogin>) {
        let login = Arc::new(FixedLogin {
            body,
            calls: AtomicUsize::new(0),
        });
        let c = SessionController::new(
            ServerSection::insecure("127.0.0.1:9"),
            login.clone(),
            Arc::new(NullUi),
        );
        (c, login)
    }

    #[tokio::test]
    async fn missing_otp_blocks_connection() {
        let (mut c, login) = controller("{}");
        let err = c.start_login("alice", "pw").await.unwrap_err();
        assert_eq!(err.code().as_str(), "LOGIN_FAILED");
        assert_eq!(login.calls.load(Ordering::SeqCst), 1);
        assert_eq!(c.connection_state(), ConnState::Idle);
        assert!(c.session().is_none());
    }

    #[tokio::test]
    async fn non_login_errors_surface_as_login_failed() {
        let (mut c, _) = controller("not json");
        let err = c.start_login("alice", "pw").await.unwrap_err();
        assert_eq!(err.code().as_str(), "LOGIN_FAILED");
        assert_eq!(c.connection_state(), ConnState::Idle);
    }

    #[test]
    fn send_without_session_is_inert() {
        let (c, _) = controller("{}");
        c.send_chat_message("hi").unwrap();
        c.send_chat_message("   ").unwrap();
        assert_eq!(c.connection_state(), ConnState::Idle);
    }
}
