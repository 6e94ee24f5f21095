use keyring::Entry;
use tracing::debug;

use super::{KeyValueStore, StorageError};

/// Default keychain service name
pub const SERVICE_NAME: &str = "chioma-session";

/// Session storage in the OS keychain. Each key is its own credential entry
/// under a shared service name.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, StorageError> {
        Ok(Entry::new(&self.service, key)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry(key)?.set_password(value)?;
        debug!(key, "Stored keychain entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
