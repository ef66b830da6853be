use serde::Deserialize;
use url::Url;

use otpchat_core::auth::ConnectionToken;
use otpchat_core::error::{ChatError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    pub server: ServerSection,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ChatError::UnsupportedVersion);
        }

        self.server.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// `host[:port]`, no scheme.
    pub host: String,

    /// `https`/`wss` when true, `http`/`ws` otherwise.
    #[serde(default = "default_secure")]
    pub secure: bool,

    #[serde(default = "default_login_path")]
    pub login_path: String,

    #[serde(default = "default_ws_path")]
    pub ws_path: String,
}

impl ServerSection {
    /// Plain-text section pointing at `host` (loopback servers, tests).
    pub fn insecure(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            secure: false,
            login_path: default_login_path(),
            ws_path: default_ws_path(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ChatError::BadConfig("server.host must not be empty".into()));
        }
        if self.host.contains("://") || self.host.contains('/') {
            return Err(ChatError::BadConfig(
                "server.host must be host[:port] without scheme or path".into(),
            ));
        }
        if !self.login_path.starts_with('/') {
            return Err(ChatError::BadConfig(
                "server.login_path must start with '/'".into(),
            ));
        }
        if !self.ws_path.starts_with('/') {
            return Err(ChatError::BadConfig("server.ws_path must start with '/'".into()));
        }
        // Surface an unparsable host at load time rather than at login.
        self.base_url(self.http_scheme())?;
        Ok(())
    }

    fn http_scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    fn ws_scheme(&self) -> &'static str {
        if self.secure {
            "wss"
        } else {
            "ws"
        }
    }

    fn base_url(&self, scheme: &str) -> Result<Url> {
        Url::parse(&format!("{scheme}://{}", self.host))
            .map_err(|e| ChatError::BadConfig(format!("server.host invalid: {e}")))
    }

    /// Login collaborator endpoint.
    pub fn login_url(&self) -> Result<Url> {
        let mut url = self.base_url(self.http_scheme())?;
        url.set_path(&self.login_path);
        Ok(url)
    }

    /// Persistent connection target, with the token as query credential.
    pub fn ws_url(&self, token: &ConnectionToken) -> Result<Url> {
        let mut url = self.base_url(self.ws_scheme())?;
        url.set_path(&self.ws_path);
        url.query_pairs_mut().append_pair("otp", token.as_str());
        Ok(url)
    }
}

fn default_secure() -> bool {
    true
}
fn default_login_path() -> String {
    "/login".into()
}
fn default_ws_path() -> String {
    "/ws".into()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn endpoints_follow_secure_flag() {
        let mut s = ServerSection::insecure("localhost:8080");
        assert_eq!(s.login_url().unwrap().as_str(), "http://localhost:8080/login");
        let t = ConnectionToken::new("abc123");
        assert_eq!(s.ws_url(&t).unwrap().as_str(), "ws://localhost:8080/ws?otp=abc123");

        s.secure = true;
        assert_eq!(s.login_url().unwrap().as_str(), "https://localhost:8080/login");
        assert_eq!(s.ws_url(&t).unwrap().as_str(), "wss://localhost:8080/ws?otp=abc123");
    }

    #[test]
    fn token_is_query_encoded() {
        let s = ServerSection::insecure("chat.example");
        let t = ConnectionToken::new("a b&c");
        assert_eq!(s.ws_url(&t).unwrap().query(), Some("otp=a+b%26c"));
    }
}
