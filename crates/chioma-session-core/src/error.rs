use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage failure: {0}")]
    Storage(#[source] StorageError),

    #[error("Session cookie failure: {0}")]
    Cookie(#[source] StorageError),

    #[error("Failed to serialize user record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Refusing to store an empty access token")]
    EmptyAccessToken,

    #[error("use_session must be called within a SessionProvider scope")]
    NoProvider,
}
