//! Client for the external users service, which owns OAuth, session tokens,
//! and user identity. This service never stores credentials itself; it only
//! holds the opaque session token in a cookie and asks the users service to
//! validate it per request.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::models::user::AuthUser;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Users service error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct RedirectUrlResponse {
    redirect_url: String,
}

#[derive(Debug, Deserialize)]
struct SessionTokenResponse {
    session_token: String,
}

#[derive(Clone)]
pub struct UsersServiceClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl UsersServiceClient {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Asks the users service for the OAuth redirect URL of the given provider.
    pub async fn oauth_redirect_url(&self, provider: &str) -> Result<String, AuthError> {
        let url = format!("{}/oauth/{provider}/redirect_url", self.api_url);
        let response = self
            .client
            .get(url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;
        let body: RedirectUrlResponse = check_status(response).await?.json().await?;
        Ok(body.redirect_url)
    }

    /// Exchanges an OAuth authorization code for an opaque session token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        let url = format!("{}/sessions", self.api_url);
        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.api_key)
            .json(&json!({ "code": code }))
            .send()
            .await?;
        let body: SessionTokenResponse = check_status(response).await?.json().await?;
        Ok(body.session_token)
    }

    /// Validates a session token. Returns the user it belongs to, or `None`
    /// when the token is unknown or expired.
    pub async fn validate_session(&self, token: &str) -> Result<Option<AuthUser>, AuthError> {
        let url = format!("{}/sessions/me", self.api_url);
        let response = self
            .client
            .get(url)
            .header("x-api-key", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::NOT_FOUND {
            debug!("session token rejected by users service");
            return Ok(None);
        }

        let user: AuthUser = check_status(response).await?.json().await?;
        Ok(Some(user))
    }

    /// Deletes a session upstream (logout). Unknown tokens are not an error.
    pub async fn delete_session(&self, token: &str) -> Result<(), AuthError> {
        let url = format!("{}/sessions", self.api_url);
        let response = self
            .client
            .delete(url)
            .header("x-api-key", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(AuthError::Api {
        status: status.as_u16(),
        message,
    })
}
