use serde::{Deserialize, Serialize};

use super::User;

/// An established session: the identity plus the credentials issued for it.
/// A user and access token only ever exist together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// In-memory session state as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    session: Option<Session>,
    loading: bool,
}

impl AuthState {
    /// Initial state before hydration has resolved
    pub fn hydrating() -> Self {
        Self {
            session: None,
            loading: true,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            session: None,
            loading: false,
        }
    }

    pub fn authenticated(session: Session) -> Self {
        Self {
            session: Some(session),
            loading: false,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.access_token.as_str())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.refresh_token.as_deref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Flatten into the shape UI code consumes
    pub fn view(&self) -> AuthView {
        AuthView {
            user: self.user().cloned(),
            access_token: self.access_token().map(str::to_string),
            refresh_token: self.refresh_token().map(str::to_string),
            is_authenticated: self.is_authenticated(),
            loading: self.loading,
        }
    }
}

/// Flat, serializable projection of [`AuthState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct AuthView {
    pub user: Option<User>,
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
    pub loading: bool,
}

/// Outcome of a login attempt. Expected failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct LoginResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginResult {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}
