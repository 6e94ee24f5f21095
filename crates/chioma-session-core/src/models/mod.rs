//! Data models for the client session.
//!
//! - `User`, `Role`: the identity record returned by the auth backend
//! - `Session`: the authenticated triple of user and tokens
//! - `AuthState`, `AuthView`: in-memory session state and its UI projection
//! - `LoginResult`: the structured outcome of a login attempt

pub mod session;
pub mod user;

pub use session::{AuthState, AuthView, LoginResult, Session};
pub use user::{Role, User};
