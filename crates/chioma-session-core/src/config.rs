//! Application configuration management.
//!
//! Holds the backend URL, request timeout, post-logout route, and which
//! storage backend keeps the session. Configuration is stored at
//! `~/.config/chioma-session/config.json`; environment variables override it.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::client::REQUEST_TIMEOUT_SECS;
use crate::api::ApiClient;
use crate::auth::SessionStore;
use crate::marker::FileCookieJar;
use crate::navigation::{Navigator, LOGIN_ROUTE};
use crate::storage::{FileStore, KeyValueStore, KeyringStore};

/// Application name used for config/data directory paths
const APP_NAME: &str = "chioma-session";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Overrides `api_base_url`
pub const ENV_API_BASE_URL: &str = "CHIOMA_API_BASE_URL";

/// Overrides `storage` (`file` or `keyring`)
pub const ENV_STORAGE: &str = "CHIOMA_STORAGE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "keyring" | "keychain" => Ok(StorageBackend::Keyring),
            other => Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub login_route: String,
    pub storage: StorageBackend,
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            login_route: LOGIN_ROUTE.to_string(),
            storage: StorageBackend::default(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read the config at `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        debug!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Apply environment overrides
    pub fn with_env(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var(ENV_API_BASE_URL) {
            if !url.trim().is_empty() {
                self.api_base_url = url.trim().to_string();
            }
        }
        if let Ok(storage) = std::env::var(ENV_STORAGE) {
            self.storage = storage
                .parse()
                .with_context(|| format!("Invalid {}", ENV_STORAGE))?;
        }
        Ok(self)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the session store this configuration describes
    pub fn build_store(&self, navigator: Arc<dyn Navigator>) -> Result<SessionStore> {
        let data_dir = self.data_dir()?;
        debug!(?data_dir, storage = ?self.storage, "Building session store");

        let storage: Arc<dyn KeyValueStore> = match self.storage {
            StorageBackend::File => Arc::new(FileStore::new(&data_dir)),
            StorageBackend::Keyring => Arc::new(KeyringStore::new()),
        };
        let api = ApiClient::with_timeout(&self.api_base_url, self.request_timeout())
            .context("Failed to build HTTP client")?;

        Ok(SessionStore::new(
            storage,
            Arc::new(FileCookieJar::new(&data_dir)),
            Arc::new(api),
            navigator,
        )
        .with_login_route(self.login_route.clone()))
    }
}
