//! Login collaborator: trades credentials for a one-time connection token.

pub mod http;

use async_trait::async_trait;

use otpchat_core::auth::{ConnectionToken, Credentials};
use otpchat_core::error::Result;

pub use http::HttpLogin;

/// Any failure must come back as `ChatError::LoginFailed`.
#[async_trait]
pub trait LoginClient: Send + Sync {
    async fn login(&self, creds: &Credentials) -> Result<ConnectionToken>;
}
