//! HTTP client for the authentication endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::{ApiError, AuthBackend, Credentials, TokenGrant};

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_PATH: &str = "/api/auth/login";
const LOGOUT_PATH: &str = "/api/auth/logout";

/// Auth API client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the backend at `base_url` with the default timeout
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!(%status, body = %ApiError::truncate_body(&body), "Auth request rejected");
            Err(ApiError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<TokenGrant, ApiError> {
        let url = self.url(LOGIN_PATH);

        let response = self.client.post(&url).json(credentials).send().await?;
        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "Failed to parse login response");
            ApiError::InvalidResponse(format!("Failed to parse login response: {}", e))
        })
    }

    async fn logout(&self, access_token: &str) -> Result<(), ApiError> {
        let url = self.url(LOGOUT_PATH);

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }
}
