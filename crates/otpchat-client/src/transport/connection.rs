//! Connection manager: owns the persistent socket and drives its lifecycle.
//!
//! States: `Idle -> Connecting -> Open -> Closed`.
//! - `Closed` is terminal for an instance. Reconnecting means building a new
//!   manager; nothing here retries.
//! - Handshake refusal, server close and network failure all end in the same
//!   `Closed` transition.
//! - Dropping the manager closes the outbound queue; the socket task then sends
//!   a close frame and exits.
//!
//! The socket lives in one spawned task. Inbound frames are decoded there and
//! forwarded in arrival order on a single event channel; outbound frames are
//! written in `send` call order.

use std::sync::Arc;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::Instrument;
use url::Url;

use otpchat_core::auth::ConnectionToken;
use otpchat_core::error::{ChatError, Result};
use otpchat_core::protocol::Envelope;

use crate::config::ServerSection;
use crate::transport::codec::{self, Inbound};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Idle,
    Connecting,
    Open,
    Closed,
}

impl ConnState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnState::Idle => "idle",
            ConnState::Connecting => "connecting",
            ConnState::Open => "open",
            ConnState::Closed => "closed",
        }
    }
}

/// What the socket task reports, in order.
#[derive(Debug)]
pub enum ConnEvent {
    Opened,
    Envelope(Envelope),
    Closed,
}

pub struct ConnectionManager {
    server: ServerSection,
    state: Arc<watch::Sender<ConnState>>,
    outbound: Option<mpsc::UnboundedSender<Message>>,
}

impl ConnectionManager {
    pub fn new(server: ServerSection) -> Self {
        let (state, _) = watch::channel(ConnState::Idle);
        Self {
            server,
            state: Arc::new(state),
            outbound: None,
        }
    }

    pub fn state(&self) -> ConnState {
        *self.state.borrow()
    }

    /// Start the handshake using `token` as query credential.
    ///
    /// Returns the inbound event stream. Must be called from within a tokio
    /// runtime; only valid while `Idle`.
    pub fn open(&mut self, token: ConnectionToken) -> Result<mpsc::UnboundedReceiver<ConnEvent>> {
        let current = self.state();
        if current != ConnState::Idle {
            return Err(ChatError::InvalidState(format!(
                "open requires idle connection, found {}",
                current.as_str()
            )));
        }

        let url = self.server.ws_url(&token)?;
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (ev_tx, ev_rx) = mpsc::unbounded_channel();

        transition(&self.state, ConnState::Connecting);
        self.outbound = Some(out_tx);

        let span = tracing::info_span!("conn", endpoint = %without_query(&url));
        tokio::spawn(run_socket(url, Arc::clone(&self.state), out_rx, ev_tx).instrument(span));

        Ok(ev_rx)
    }

    /// Queue a pre-encoded envelope.
    ///
    /// Anything sent while not `Open` is dropped without error; the return
    /// value only tells whether the frame was queued.
    pub fn send(&self, bytes: Bytes) -> bool {
        let state = self.state();
        if state != ConnState::Open {
            tracing::debug!(state = state.as_str(), "send while not open; frame dropped");
            return false;
        }
        match &self.outbound {
            Some(tx) => tx.send(codec::encode(bytes)).is_ok(),
            None => false,
        }
    }

    /// Wait until the handshake has resolved (`Open` or `Closed`).
    /// An `Idle` manager resolves immediately.
    pub async fn settled(&self) -> ConnState {
        self.wait_until(|s| s != ConnState::Connecting).await
    }

    /// Wait for the terminal `Closed` state.
    pub async fn closed(&self) -> ConnState {
        self.wait_until(|s| s == ConnState::Closed || s == ConnState::Idle)
            .await
    }

    async fn wait_until(&self, pred: impl Fn(ConnState) -> bool) -> ConnState {
        let mut rx = self.state.subscribe();
        let settled = rx
            .wait_for(|s| pred(*s))
            .await
            .map(|s| *s)
            .unwrap_or(ConnState::Closed);
        settled
    }
}

fn transition(state: &watch::Sender<ConnState>, next: ConnState) {
    let prev = state.send_replace(next);
    tracing::info!(from = prev.as_str(), to = next.as_str(), "connection state");
}

// The query carries the one-time token; keep it out of logs.
fn without_query(url: &Url) -> String {
    let mut u = url.clone();
    u.set_query(None);
    u.to_string()
}

async fn run_socket(
    url: Url,
    state: Arc<watch::Sender<ConnState>>,
    mut out_rx: mpsc::UnboundedReceiver<Message>,
    events: mpsc::UnboundedSender<ConnEvent>,
) {
    let socket = match connect_async(url.as_str()).await {
        Ok((socket, _resp)) => socket,
        Err(e) => {
            let closed = ChatError::TransportClosed;
            tracing::warn!(code = closed.code().as_str(), error = %e, "handshake failed");
            transition(&state, ConnState::Closed);
            let _ = events.send(ConnEvent::Closed);
            return;
        }
    };

    transition(&state, ConnState::Open);
    let _ = events.send(ConnEvent::Opened);

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(m) => {
                        if let Err(e) = ws_tx.send(m).await {
                            tracing::debug!(error = %e, "write failed");
                            break;
                        }
                    }
                    None => {
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let msg = match incoming {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::debug!(error = %e, "read failed");
                        break;
                    }
                };

                match codec::decode(msg) {
                    Ok(Inbound::Envelope(env)) => {
                        if events.send(ConnEvent::Envelope(env)).is_err() {
                            tracing::debug!("event receiver dropped");
                        }
                    }
                    Ok(Inbound::Control) => {}
                    Ok(Inbound::Close) => break,
                    // per-message failure: log, drop, stay open
                    Err(e) => {
                        tracing::warn!(code = e.code().as_str(), error = %e, "inbound frame dropped");
                    }
                }
            }
        }
    }

    let closed = ChatError::TransportClosed;
    tracing::info!(code = closed.code().as_str(), reason = %closed, "connection ended");
    transition(&state, ConnState::Closed);
    let _ = events.send(ConnEvent::Closed);
}
