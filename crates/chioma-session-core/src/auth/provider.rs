//! Scoped access to the session store.
//!
//! The store is built once at the application boundary and mounted for a
//! task with [`SessionProvider::scope`]. Code running inside that task reaches
//! it through [`use_session`]; anywhere else the lookup fails fast.

use std::future::Future;
use std::sync::Arc;

use super::SessionStore;
use crate::error::SessionError;

tokio::task_local! {
    static CURRENT_SESSION: Arc<SessionStore>;
}

pub struct SessionProvider;

impl SessionProvider {
    /// Run `f` with `store` mounted as the current session
    pub async fn scope<F>(store: Arc<SessionStore>, f: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_SESSION.scope(store, f).await
    }
}

/// The session store mounted for the current task
pub fn use_session() -> Result<Arc<SessionStore>, SessionError> {
    CURRENT_SESSION
        .try_with(Arc::clone)
        .map_err(|_| SessionError::NoProvider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::api::{ApiError, AuthBackend, Credentials, TokenGrant};
    use crate::marker::MemoryCookieJar;
    use crate::navigation::LogNavigator;
    use crate::storage::MemoryStore;

    struct NoBackend;

    #[async_trait]
    impl AuthBackend for NoBackend {
        async fn login(&self, _credentials: &Credentials) -> Result<TokenGrant, ApiError> {
            Err(ApiError::InvalidResponse("offline".to_string()))
        }

        async fn logout(&self, _access_token: &str) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn store() -> Arc<SessionStore> {
        Arc::new(SessionStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryCookieJar::new()),
            Arc::new(NoBackend),
            Arc::new(LogNavigator::new()),
        ))
    }

    #[tokio::test]
    async fn test_use_session_outside_scope_fails() {
        assert!(matches!(use_session(), Err(SessionError::NoProvider)));
    }

    #[tokio::test]
    async fn test_use_session_inside_scope_returns_mounted_store() {
        let mounted = store();
        let expected = mounted.clone();
        let same = SessionProvider::scope(mounted, async move {
            let found = use_session().expect("store should be mounted");
            Arc::ptr_eq(&found, &expected)
        })
        .await;
        assert!(same);
    }

    #[tokio::test]
    async fn test_scope_does_not_leak_into_spawned_tasks() {
        let leaked = SessionProvider::scope(store(), async {
            tokio::spawn(async { use_session().is_ok() }).await.unwrap()
        })
        .await;
        assert!(!leaked);
    }
}
