//! Session management.
//!
//! This module provides:
//! - `SessionStore`: the stateful session, its hydration, login, and logout
//! - `SessionProvider` / `use_session`: task-scoped access to one store
//!
//! There is no token refresh flow. Access tokens are stored and forwarded
//! as-is until logout.

pub mod provider;
pub mod store;

pub use provider::{use_session, SessionProvider};
pub use store::{Hydration, ResetReason, SessionStore, SUPERSEDED_MESSAGE};
