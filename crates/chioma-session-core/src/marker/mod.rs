//! The session marker cookie.
//!
//! A presence marker read by the server-side request gate to decide whether a
//! request plausibly carries a session. It is not a trust boundary: the value
//! is the access token, but the cookie is script-readable (no `Secure`, no
//! `HttpOnly`) and the gate must re-verify anything security-sensitive.
//!
//! Shape: `chioma_auth_token=<access token>; Path=/; Max-Age=604800; SameSite=Lax`,
//! plus an absolute `Expires` seven days out so stored copies can age out.
//! Removal sets an empty value with `Max-Age=0` and the same path.

pub mod gate;
pub mod jar;

use cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

use crate::storage::StorageError;

pub use jar::{FileCookieJar, MemoryCookieJar};

/// Cookie name shared with the request gate
pub const AUTH_COOKIE_NAME: &str = "chioma_auth_token";

/// Marker lifetime: 7 days
pub const AUTH_COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

/// Build the marker cookie carrying `access_token`
pub fn session_cookie(access_token: &str) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, access_token.to_string()))
        .path("/")
        .max_age(Duration::seconds(AUTH_COOKIE_MAX_AGE_SECS))
        .expires(OffsetDateTime::now_utc() + Duration::seconds(AUTH_COOKIE_MAX_AGE_SECS))
        .same_site(SameSite::Lax)
        .build()
}

/// Build the cookie that clears the marker
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .same_site(SameSite::Lax)
        .build()
}

/// True when `cookie` instructs the client to drop it
pub fn is_removal(cookie: &Cookie<'_>) -> bool {
    matches!(cookie.max_age(), Some(age) if age <= Duration::ZERO)
}

/// True when `cookie` carries an absolute expiry at or before `now`
pub fn is_expired(cookie: &Cookie<'_>, now: OffsetDateTime) -> bool {
    matches!(cookie.expires_datetime(), Some(at) if at <= now)
}

/// Where the session store writes the marker cookie.
pub trait CookieSink: Send + Sync {
    fn set_cookie(&self, cookie: Cookie<'static>) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("t1");
        assert_eq!(cookie.name(), AUTH_COOKIE_NAME);
        assert_eq!(cookie.value(), "t1");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(604_800)));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), None);
        assert_eq!(cookie.http_only(), None);
        assert!(!is_removal(&cookie));
    }

    #[test]
    fn test_session_cookie_expires_in_seven_days() {
        let now = OffsetDateTime::now_utc();
        let cookie = session_cookie("t1");
        let expires = cookie.expires_datetime().expect("expiry should be set");
        let window = expires - now;
        assert!(window <= Duration::seconds(AUTH_COOKIE_MAX_AGE_SECS));
        assert!(window > Duration::seconds(AUTH_COOKIE_MAX_AGE_SECS - 60));
        assert!(!is_expired(&cookie, now));
        assert!(is_expired(&cookie, now + Duration::days(8)));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie();
        assert_eq!(cookie.name(), AUTH_COOKIE_NAME);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
        assert!(is_removal(&cookie));
    }

    #[test]
    fn test_set_cookie_header_contains_attributes() {
        let header = session_cookie("abc").to_string();
        assert!(header.starts_with("chioma_auth_token=abc"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Max-Age=604800"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Expires="));
        assert!(!header.contains("Secure"));
        assert!(!header.contains("HttpOnly"));
    }
}
