//! Helpers for the request-gating layer that reads the marker cookie.
//!
//! These only answer "is a marker present". Whatever the gate lets through
//! must still be authenticated by the backend.

use cookie::Cookie;

use super::AUTH_COOKIE_NAME;

/// Extract the marker value from a `Cookie:` request header
pub fn session_marker(cookie_header: &str) -> Option<String> {
    Cookie::split_parse(cookie_header)
        .filter_map(Result::ok)
        .find(|c| c.name() == AUTH_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// True when the header carries a non-empty marker
pub fn has_session_marker(cookie_header: &str) -> bool {
    session_marker(cookie_header).is_some()
}
