use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Shown when a rejected login carries no usable message
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials. Please try again.";

/// Shown when the login request never produced a usable response
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request rejected with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Error body shape. Validation failures carry `message` as a list of
/// strings rather than a single one.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Value,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        let message = match self.message {
            Value::String(message) => message,
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            _ => return None,
        };
        Some(message).filter(|m| !m.trim().is_empty())
    }
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", cut, body.len())
        }
    }

    /// Build a rejection from a non-success response, keeping the
    /// backend's `message` when the body carries one.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_message);
        ApiError::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    /// Message suitable for showing on a login form
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Rejected { message: None, .. } => INVALID_CREDENTIALS_MESSAGE.to_string(),
            ApiError::NetworkError(_) | ApiError::InvalidResponse(_) => {
                NETWORK_ERROR_MESSAGE.to_string()
            }
        }
    }
}
