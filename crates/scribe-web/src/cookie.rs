//! Minimal `Cookie` / `Set-Cookie` handling for the two cookies the site uses.

use axum::http::{HeaderMap, header};

/// Bearer token of the logged-in session.
pub const SESSION_COOKIE: &str = "scribe_session";
/// Pending notices, base64url-encoded JSON.
pub const NOTICE_COOKIE: &str = "scribe_notices";

/// Find `name` among all `Cookie` request headers.
pub fn read(headers: &HeaderMap, name: &str) -> Option<String> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(k, _)| *k == name)
    .map(|(_, v)| v.trim_matches('"').to_owned())
}

/// A `Set-Cookie` value. `max_age` of `None` makes a browser-session cookie.
pub fn set(name: &str, value: &str, max_age: Option<i64>, secure: bool) -> String {
  let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax");
  if let Some(secs) = max_age {
    cookie.push_str(&format!("; Max-Age={secs}"));
  }
  if secure {
    cookie.push_str("; Secure");
  }
  cookie
}

/// A `Set-Cookie` value that deletes `name`.
pub fn expire(name: &str, secure: bool) -> String { set(name, "", Some(0), secure) }
