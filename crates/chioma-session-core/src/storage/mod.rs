//! Durable client storage for the session.
//!
//! This module provides:
//! - `KeyValueStore`: the string key/value seam the session store writes through
//! - `MemoryStore`: process-local storage (tests, ephemeral sessions)
//! - `FileStore`: a JSON file in the data directory, written atomically
//! - `KeyringStore`: OS keychain storage, one entry per key
//!
//! Only the session store writes the keys listed in [`SESSION_KEYS`].

pub mod file;
pub mod keychain;
pub mod memory;

use thiserror::Error;

pub use self::file::FileStore;
pub use self::keychain::KeyringStore;
pub use self::memory::MemoryStore;

/// Raw access token string
pub const ACCESS_TOKEN_KEY: &str = "chioma_access_token";

/// Raw refresh token string
pub const REFRESH_TOKEN_KEY: &str = "chioma_refresh_token";

/// JSON-serialized user record
pub const USER_KEY: &str = "chioma_user";

/// Every key owned by the session store
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY];

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// String key/value storage that survives process restart.
///
/// Writes are synchronous and unretried; a failure surfaces to the caller.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every session key, stopping at the first failure
    fn clear_session(&self) -> Result<(), StorageError> {
        for key in SESSION_KEYS {
            self.remove(key)?;
        }
        Ok(())
    }
}
