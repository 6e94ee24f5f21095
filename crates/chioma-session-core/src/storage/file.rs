use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};

/// Session storage file name in the data directory
pub const SESSION_FILE: &str = "session.json";

/// Key/value storage backed by a single JSON object on disk.
///
/// Writes go to a sibling temp file that is then renamed over the original,
/// so a crash mid-write leaves either the old or the new contents.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(data_dir: &Path) -> Self {
        Self::at(data_dir.join(SESSION_FILE))
    }

    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Like `read_map`, but an unreadable file is discarded so that writes
    /// can always replace it.
    fn read_map_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_map() {
            Ok(map) => Ok(map),
            Err(StorageError::Serialization(e)) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unparsable session file");
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if map.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
                debug!(path = %self.path.display(), "Removed empty session file");
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(map)?;
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, StorageError> {
        self.lock
            .lock()
            .map_err(|_| StorageError::Unavailable("file store lock poisoned".to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.guard()?;
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        let mut map = self.read_map_for_write()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        let mut map = match self.read_map() {
            Ok(map) if !map.contains_key(key) => return Ok(()),
            Ok(map) => map,
            // Unparsable contents cannot hold a valid entry; rewrite empty
            Err(StorageError::Serialization(_)) => self.read_map_for_write()?,
            Err(e) => return Err(e),
        };
        map.remove(key);
        self.write_map(&map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ACCESS_TOKEN_KEY, USER_KEY};

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set(ACCESS_TOKEN_KEY, "t1").unwrap();
        store.set(USER_KEY, r#"{"id":"1"}"#).unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("t1"));
        assert_eq!(reopened.get(USER_KEY).unwrap().as_deref(), Some(r#"{"id":"1"}"#));
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(&dir.path().join("nested"));
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
        store.remove(ACCESS_TOKEN_KEY).unwrap();
    }

    #[test]
    fn test_removing_last_key_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set(ACCESS_TOKEN_KEY, "t1").unwrap();
        assert!(store.path().exists());

        store.clear_session().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_errors_on_read_but_not_on_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(
            store.get(ACCESS_TOKEN_KEY),
            Err(StorageError::Serialization(_))
        ));

        store.clear_session().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
    }
}
