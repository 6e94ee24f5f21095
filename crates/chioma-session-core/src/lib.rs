//! Client-side session management for Chioma.
//!
//! A [`SessionStore`] owns the signed-in user and their tokens and keeps three
//! mirrors of them in agreement: persistent key/value storage, the session
//! marker cookie read by the request gate, and the in-memory state UI
//! subscribes to.
//!
//! The crate never inspects or verifies tokens; it stores and forwards them.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod marker;
pub mod models;
pub mod navigation;
pub mod storage;

pub use auth::{use_session, Hydration, SessionProvider, SessionStore};
pub use config::Config;
pub use error::SessionError;
pub use models::{AuthState, AuthView, LoginResult, Role, Session, User};
