//! otpchat terminal client
//!
//! - Reads config (default `otpchat.yaml`, or the first argument)
//! - Prompts for username/password on stdin, logs in, opens /ws?otp=...
//! - Every further stdin line is sent as a chat message until EOF
//! - When the connection closes, the login prompt comes back

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use otpchat_client::{
    config, login::HttpLogin, transport::ConnState, ui::TerminalUi, SessionController,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "otpchat.yaml".into());
    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, %path, "config load failed");
            std::process::exit(2);
        }
    };

    let login = match HttpLogin::new(&cfg.server) {
        Ok(login) => Arc::new(login),
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "login client setup failed");
            std::process::exit(2);
        }
    };

    let ui = Arc::new(TerminalUi::new());
    let mut session = SessionController::new(cfg.server.clone(), login, ui);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tracing::info!(host = %cfg.server.host, "otpchat-client starting");

    loop {
        let Some(username) = prompt(&mut lines, "username: ").await else {
            return;
        };
        let Some(password) = prompt(&mut lines, "password: ").await else {
            return;
        };

        if let Err(e) = session.start_login(username.trim(), &password).await {
            eprintln!("{e}");
            continue;
        }
        if session.wait_settled().await != ConnState::Open {
            continue;
        }

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if let Err(e) = session.send_chat_message(&line) {
                                tracing::warn!(code = e.code().as_str(), error = %e, "send failed");
                            }
                        }
                        Ok(None) => return,
                        Err(e) => {
                            tracing::warn!(error = %e, "stdin read failed");
                            return;
                        }
                    }
                }
                _ = session.wait_closed() => break,
            }
        }

        // let the disconnected line render before prompting again
        session.finished().await;
    }
}

async fn prompt<R>(lines: &mut tokio::io::Lines<R>, label: &str) -> Option<String>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut out = tokio::io::stdout();
    let _ = out.write_all(label.as_bytes()).await;
    let _ = out.flush().await;
    lines.next_line().await.ok().flatten()
}
