//! In-process chat server and a recording UI for integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::sync::mpsc;

use otpchat_client::ui::ChatUi;

pub struct ServerOptions {
    pub login_status: StatusCode,
    pub login_body: &'static str,
    pub expected_otp: &'static str,
    /// Frames pushed to the client right after upgrade.
    pub push: Vec<&'static str>,
    /// How many of the first sessions are closed by the server right after the push.
    pub close_first_sessions: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            login_status: StatusCode::OK,
            login_body: r#"{"otp":"abc123"}"#,
            expected_otp: "abc123",
            push: Vec::new(),
            close_first_sessions: 0,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Received {
    Login(String),
    Upgrade(String),
    Text(String),
}

#[derive(Clone)]
struct ServerState {
    opts: Arc<ServerOptions>,
    sessions: Arc<AtomicUsize>,
    received: mpsc::UnboundedSender<Received>,
}

pub struct FakeServer {
    pub addr: SocketAddr,
    pub received: mpsc::UnboundedReceiver<Received>,
}

impl FakeServer {
    pub async fn spawn(opts: ServerOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = ServerState {
            opts: Arc::new(opts),
            sessions: Arc::new(AtomicUsize::new(0)),
            received: tx,
        };

        let app = Router::new()
            .route("/login", post(login))
            .route("/ws", get(ws_upgrade))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, received: rx }
    }

    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    pub async fn next(&mut self) -> Received {
        within(self.received.recv()).await.expect("server channel closed")
    }
}

async fn login(State(s): State<ServerState>, body: String) -> Response {
    let _ = s.received.send(Received::Login(body));
    (
        s.opts.login_status,
        [(header::CONTENT_TYPE, "application/json")],
        s.opts.login_body,
    )
        .into_response()
}

async fn ws_upgrade(
    State(s): State<ServerState>,
    Query(q): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let otp = q.get("otp").cloned().unwrap_or_default();
    if otp != s.opts.expected_otp {
        return (StatusCode::UNAUTHORIZED, "Not a valid OTP token").into_response();
    }
    let _ = s.received.send(Received::Upgrade(otp));
    ws.on_upgrade(move |socket| run_session(socket, s))
}

async fn run_session(mut socket: WebSocket, s: ServerState) {
    let nth = s.sessions.fetch_add(1, Ordering::SeqCst);
    for frame in &s.opts.push {
        if socket.send(Message::Text((*frame).to_owned())).await.is_err() {
            return;
        }
    }
    if nth < s.opts.close_first_sessions {
        let _ = socket.send(Message::Close(None)).await;
        return;
    }
    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(t) => {
                let _ = s.received.send(Received::Text(t));
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Connected,
    Disconnected,
    Message {
        from: String,
        message: String,
        timestamp: String,
    },
}

pub struct RecordingUi {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl RecordingUi {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl ChatUi for RecordingUi {
    fn on_connected(&self) {
        let _ = self.tx.send(UiEvent::Connected);
    }

    fn on_disconnected(&self) {
        let _ = self.tx.send(UiEvent::Disconnected);
    }

    fn on_new_message(&self, from: &str, message: &str, timestamp: &str) {
        let _ = self.tx.send(UiEvent::Message {
            from: from.to_owned(),
            message: message.to_owned(),
            timestamp: timestamp.to_owned(),
        });
    }
}

pub async fn within<F: std::future::Future>(f: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("timed out")
}

pub async fn next_ui(rx: &mut mpsc::UnboundedReceiver<UiEvent>) -> UiEvent {
    within(rx.recv()).await.expect("ui channel closed")
}
