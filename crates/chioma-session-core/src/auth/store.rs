//! The session store: one in-memory session kept in step with persistent
//! storage and the marker cookie.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{AuthBackend, Credentials, TokenGrant, NETWORK_ERROR_MESSAGE};
use crate::error::SessionError;
use crate::marker::{removal_cookie, session_cookie, CookieSink};
use crate::models::{AuthState, LoginResult, Session, User};
use crate::navigation::{Navigator, LOGIN_ROUTE};
use crate::storage::{
    KeyValueStore, StorageError, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY,
};

/// Returned to a login whose result arrived after a newer session change
pub const SUPERSEDED_MESSAGE: &str = "Login superseded by a newer session change.";

/// How hydration resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// A complete stored session was restored
    Restored,
    /// Nothing was stored
    Empty,
    /// An invalid record was found and cleared
    Reset(ResetReason),
    /// State had already left the hydrating phase
    AlreadyResolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    /// The stored user record did not parse
    CorruptUser,
    /// Access token or user missing while other session keys remained
    PartialRecord,
    /// Storage could not be read
    Unreadable,
}

/// Raw values of the three session keys. Empty strings count as absent.
#[derive(Debug, Default)]
struct StoredRecord {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<String>,
}

impl StoredRecord {
    fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    cookies: Arc<dyn CookieSink>,
    backend: Arc<dyn AuthBackend>,
    navigator: Arc<dyn Navigator>,
    login_route: String,
    state: watch::Sender<AuthState>,
    // Held for every read-validate-write-commit sequence
    commit_lock: Mutex<()>,
    // Bumped whenever a new credential exchange starts or the session is
    // replaced; a login may only commit if it still holds the latest value.
    generation: AtomicU64,
}

impl SessionStore {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        cookies: Arc<dyn CookieSink>,
        backend: Arc<dyn AuthBackend>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(AuthState::hydrating());
        Self {
            storage,
            cookies,
            backend,
            navigator,
            login_route: LOGIN_ROUTE.to_string(),
            state,
            commit_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Override the route visited after logout
    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    /// Current state snapshot
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receive every subsequent state commit
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    // =========================================================================
    // Hydration
    // =========================================================================

    /// Restore the session from persistent storage.
    ///
    /// Resolves `loading` exactly once. A stored record that could not have
    /// been written by `set_tokens` is cleared entirely, cookie included. If
    /// that cleanup fails the state still resolves unauthenticated and the
    /// failure is returned.
    pub fn hydrate(&self) -> Result<Hydration, SessionError> {
        let _guard = self.lock();
        if !self.state.borrow().is_loading() {
            return Ok(Hydration::AlreadyResolved);
        }

        let record = match self.read_record() {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Failed to read stored session, resetting");
                return self.reset_during_hydration(ResetReason::Unreadable);
            }
        };

        match record {
            StoredRecord {
                access_token: Some(access_token),
                refresh_token,
                user: Some(user_json),
            } => match serde_json::from_str::<User>(&user_json) {
                Ok(user) => {
                    debug!(user_id = %user.id, "Restored stored session");
                    self.commit(AuthState::authenticated(Session {
                        user,
                        access_token,
                        refresh_token,
                    }));
                    Ok(Hydration::Restored)
                }
                Err(e) => {
                    warn!(error = %e, "Stored user record is corrupt, resetting");
                    self.reset_during_hydration(ResetReason::CorruptUser)
                }
            },
            record if record.is_empty() => {
                debug!("No stored session");
                self.commit(AuthState::unauthenticated());
                Ok(Hydration::Empty)
            }
            record => {
                warn!(
                    has_access_token = record.access_token.is_some(),
                    has_refresh_token = record.refresh_token.is_some(),
                    has_user = record.user.is_some(),
                    "Stored session is incomplete, resetting"
                );
                self.reset_during_hydration(ResetReason::PartialRecord)
            }
        }
    }

    fn read_record(&self) -> Result<StoredRecord, StorageError> {
        let read = |key: &str| -> Result<Option<String>, StorageError> {
            Ok(self.storage.get(key)?.filter(|v| !v.is_empty()))
        };
        Ok(StoredRecord {
            access_token: read(ACCESS_TOKEN_KEY)?,
            refresh_token: read(REFRESH_TOKEN_KEY)?,
            user: read(USER_KEY)?,
        })
    }

    fn reset_during_hydration(&self, reason: ResetReason) -> Result<Hydration, SessionError> {
        let cleared = self.clear_mirrors();
        self.commit(AuthState::unauthenticated());
        cleared?;
        Ok(Hydration::Reset(reason))
    }

    // =========================================================================
    // Establishing a session
    // =========================================================================

    /// Store tokens and user directly, e.g. after registration.
    ///
    /// Writes all three storage keys and the cookie, then commits the
    /// authenticated state in one step. A `None` refresh token deletes the
    /// stored one. Any login still in flight is superseded.
    pub fn set_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
        user: &User,
    ) -> Result<(), SessionError> {
        let _guard = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.write_session(Session {
            user: user.clone(),
            access_token: access_token.to_string(),
            refresh_token: refresh_token.map(str::to_string),
        })
    }

    /// Exchange credentials with the backend and, on success, commit the
    /// returned session.
    ///
    /// Rejections and transport failures come back as a failed
    /// [`LoginResult`] and leave state untouched. Only a storage or cookie
    /// write failure during the commit is an `Err`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, SessionError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let credentials = Credentials::new(email, password);

        let grant = match self.backend.login(&credentials).await {
            Ok(grant) => grant,
            Err(e) => {
                warn!(error = %e, "Login failed");
                return Ok(LoginResult::failure(e.user_message()));
            }
        };

        if grant.access_token.is_empty() {
            warn!("Login response carried an empty access token");
            return Ok(LoginResult::failure(NETWORK_ERROR_MESSAGE));
        }

        let _guard = self.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            info!("Discarding superseded login result");
            return Ok(LoginResult::failure(SUPERSEDED_MESSAGE));
        }

        let TokenGrant {
            access_token,
            refresh_token,
            user,
        } = grant;
        let user_id = user.id.clone();
        self.write_session(Session {
            user,
            access_token,
            refresh_token,
        })?;

        info!(user_id = %user_id, "Login successful");
        Ok(LoginResult::success())
    }

    /// Mirror `session` to storage and the cookie, then commit it.
    /// Caller holds the commit lock.
    fn write_session(&self, session: Session) -> Result<(), SessionError> {
        if session.access_token.is_empty() {
            return Err(SessionError::EmptyAccessToken);
        }
        let user_json = serde_json::to_string(&session.user)?;

        self.storage
            .set(ACCESS_TOKEN_KEY, &session.access_token)
            .map_err(SessionError::Storage)?;
        let refresh_write = match session.refresh_token.as_deref() {
            Some(refresh_token) => self.storage.set(REFRESH_TOKEN_KEY, refresh_token),
            None => self.storage.remove(REFRESH_TOKEN_KEY),
        };
        refresh_write.map_err(SessionError::Storage)?;
        self.storage
            .set(USER_KEY, &user_json)
            .map_err(SessionError::Storage)?;

        self.cookies
            .set_cookie(session_cookie(&session.access_token))
            .map_err(SessionError::Cookie)?;

        self.commit(AuthState::authenticated(session));
        Ok(())
    }

    // =========================================================================
    // Ending a session
    // =========================================================================

    /// Notify the backend (best effort), clear every mirror, and navigate to
    /// the login route.
    ///
    /// The backend call's outcome never matters. Local state ends
    /// unauthenticated and navigation happens; a storage or cookie failure
    /// during cleanup is returned afterwards. If a `login` or `set_tokens`
    /// started while the backend was being notified, that newer session is
    /// left in place and no cleanup or navigation happens.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let token = match self.storage.get(ACCESS_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read access token for logout");
                None
            }
        };

        if let Some(token) = token {
            match self.backend.logout(&token).await {
                Ok(()) => debug!("Backend acknowledged logout"),
                Err(e) => warn!(error = %e, "Logout notification failed, clearing local session anyway"),
            }
        }

        let cleared = {
            let _guard = self.lock();
            if self.generation.load(Ordering::SeqCst) != generation {
                info!("Session changed during logout, keeping the newer session");
                return Ok(());
            }
            let cleared = self.clear_mirrors();
            self.commit(AuthState::unauthenticated());
            cleared
        };

        self.navigator.navigate(&self.login_route);
        info!("Logged out");
        cleared
    }

    /// Delete every session key and the cookie. Both are attempted even if
    /// the first fails; the first failure is returned.
    fn clear_mirrors(&self) -> Result<(), SessionError> {
        let storage = self.storage.clear_session().map_err(SessionError::Storage);
        let cookie = self
            .cookies
            .set_cookie(removal_cookie())
            .map_err(SessionError::Cookie);
        storage.and(cookie)
    }

    fn commit(&self, state: AuthState) {
        debug!(
            authenticated = state.is_authenticated(),
            loading = state.is_loading(),
            "Committing session state"
        );
        self.state.send_replace(state);
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.commit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Tests
// ============================================================================
