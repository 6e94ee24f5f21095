use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cookie::Cookie;
use time::OffsetDateTime;
use tracing::debug;

use super::{is_expired, is_removal, CookieSink};
use crate::storage::StorageError;

/// Marker cookie file name in the data directory
pub const COOKIE_FILE: &str = "session.cookie";

/// In-process cookie jar keyed by cookie name.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<HashMap<String, Cookie<'static>>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live cookie; expired ones read as absent
    pub fn get(&self, name: &str) -> Option<Cookie<'static>> {
        let now = OffsetDateTime::now_utc();
        self.cookies
            .lock()
            .ok()?
            .get(name)
            .filter(|c| !is_expired(c, now))
            .cloned()
    }

    /// Render the live cookies as a `Cookie:` request header
    pub fn header(&self) -> String {
        let Ok(cookies) = self.cookies.lock() else {
            return String::new();
        };
        let now = OffsetDateTime::now_utc();
        let mut pairs: Vec<String> = cookies
            .values()
            .filter(|c| !is_expired(c, now))
            .map(|c| format!("{}={}", c.name(), c.value()))
            .collect();
        pairs.sort();
        pairs.join("; ")
    }
}

impl CookieSink for MemoryCookieJar {
    fn set_cookie(&self, cookie: Cookie<'static>) -> Result<(), StorageError> {
        let mut cookies = self
            .cookies
            .lock()
            .map_err(|_| StorageError::Unavailable("cookie jar lock poisoned".to_string()))?;
        if is_removal(&cookie) {
            cookies.remove(cookie.name());
        } else {
            cookies.insert(cookie.name().to_string(), cookie);
        }
        Ok(())
    }
}

/// Persists the marker as a `Set-Cookie` line so a local gate process can
/// read it. Removal deletes the file.
#[derive(Debug, Clone)]
pub struct FileCookieJar {
    path: PathBuf,
}

impl FileCookieJar {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(COOKIE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back the stored cookie, if any. A cookie past its `Expires`
    /// reads as absent.
    pub fn read(&self) -> Result<Option<Cookie<'static>>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        match Cookie::parse(contents.trim().to_string()) {
            Ok(cookie) if is_expired(&cookie, OffsetDateTime::now_utc()) => {
                debug!(path = %self.path.display(), "Stored session cookie has expired");
                Ok(None)
            }
            Ok(cookie) => Ok(Some(cookie)),
            Err(e) => Err(StorageError::Unavailable(format!(
                "Unparsable cookie file: {}",
                e
            ))),
        }
    }
}

impl CookieSink for FileCookieJar {
    fn set_cookie(&self, cookie: Cookie<'static>) -> Result<(), StorageError> {
        if is_removal(&cookie) {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
                debug!(path = %self.path.display(), "Removed session cookie file");
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, cookie.to_string())?;
        Ok(())
    }
}
