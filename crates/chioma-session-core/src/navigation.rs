//! The post-logout redirect.

use std::sync::Mutex;

use tracing::info;

/// Login entry route
pub const LOGIN_ROUTE: &str = "/login";

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Navigator for front ends without a router: logs each redirect and keeps
/// the history so callers can act on it.
#[derive(Debug, Default)]
pub struct LogNavigator {
    history: Mutex<Vec<String>>,
}

impl LogNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn last_route(&self) -> Option<String> {
        self.history.lock().ok()?.last().cloned()
    }
}

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        info!(route, "Navigating");
        if let Ok(mut history) = self.history.lock() {
            history.push(route.to_string());
        }
    }
}
