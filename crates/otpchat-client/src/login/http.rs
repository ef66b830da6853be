use async_trait::async_trait;
use url::Url;

use otpchat_core::auth::{ConnectionToken, Credentials, LoginResponse};
use otpchat_core::error::{ChatError, Result};

use crate::config::ServerSection;
use crate::login::LoginClient;

/// `POST <login_url>` with a JSON body, expecting `{"otp": ...}` back.
pub struct HttpLogin {
    client: reqwest::Client,
    url: Url,
}

impl HttpLogin {
    pub fn new(server: &ServerSection) -> Result<Self> {
        Ok(Self::with_client(reqwest::Client::new(), server.login_url()?))
    }

    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl LoginClient for HttpLogin {
    async fn login(&self, creds: &Credentials) -> Result<ConnectionToken> {
        let response = self
            .client
            .post(self.url.clone())
            .json(creds)
            .send()
            .await
            .map_err(|e| ChatError::LoginFailed(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::LoginFailed(format!(
                "status code {}",
                status.as_u16()
            )));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| ChatError::LoginFailed(format!("invalid login response: {e}")))?;

        body.into_token()
    }
}
