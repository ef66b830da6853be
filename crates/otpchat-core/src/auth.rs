//! Login wire types and the one-time connection token.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChatError, Result};

/// `POST /login` request body.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `POST /login` success body. Anything besides `otp` is ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub otp: Option<String>,
}

impl LoginResponse {
    pub fn into_token(self) -> Result<ConnectionToken> {
        match self.otp {
            Some(otp) if !otp.is_empty() => Ok(ConnectionToken::new(otp)),
            _ => Err(ChatError::LoginFailed("no otp in login response".into())),
        }
    }
}

/// One-time token authorising a single connection attempt.
///
/// Not `Clone`: opening a connection consumes it.
#[derive(PartialEq, Eq)]
pub struct ConnectionToken(String);

impl ConnectionToken {
    pub fn new(otp: impl Into<String>) -> Self {
        Self(otp.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConnectionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConnectionToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn empty_body_is_login_failure() {
        let r: LoginResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(r.into_token().unwrap_err().code().as_str(), "LOGIN_FAILED");

        let r: LoginResponse = serde_json::from_str(r#"{"otp":""}"#).unwrap();
        assert!(r.into_token().is_err());
    }

    #[test]
    fn otp_becomes_token() {
        let r: LoginResponse = serde_json::from_str(r#"{"otp":"abc123","ttl":5}"#).unwrap();
        let t = r.into_token().unwrap();
        assert_eq!(t.as_str(), "abc123");
        assert_eq!(format!("{t:?}"), "ConnectionToken(<redacted>)");
    }

    #[test]
    fn credentials_debug_hides_password() {
        let c = Credentials::new("alice", "hunter2");
        assert!(!format!("{c:?}").contains("hunter2"));
        assert_eq!(
            serde_json::to_string(&c).unwrap(),
            r#"{"username":"alice","password":"hunter2"}"#
        );
    }
}
