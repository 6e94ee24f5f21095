use std::collections::HashMap;
use std::sync::Mutex;

use super::{KeyValueStore, StorageError};

/// In-process key/value store. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> Result<T, StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(f(&mut entries))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.with_entries(|e| e.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.with_entries(|e| {
            e.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.with_entries(|e| {
            e.remove(key);
        })
    }
}
