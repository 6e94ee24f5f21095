//! Client for the authentication backend.
//!
//! `AuthBackend` is the seam the session store calls through; `ApiClient`
//! implements it over HTTPS with reqwest. The backend itself is a black box:
//!
//! - `POST /api/auth/login` with `{email, password}` returns
//!   `{accessToken, refreshToken, user}` or, on failure, optionally `{message}`
//! - `POST /api/auth/logout` with a bearer token; the response is ignored

pub mod client;
pub mod error;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::User;

pub use client::ApiClient;
pub use error::{ApiError, INVALID_CREDENTIALS_MESSAGE, NETWORK_ERROR_MESSAGE};

/// Login request body
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login response body
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for tokens
    async fn login(&self, credentials: &Credentials) -> Result<TokenGrant, ApiError>;

    /// Tell the backend the session is over
    async fn logout(&self, access_token: &str) -> Result<(), ApiError>;
}
