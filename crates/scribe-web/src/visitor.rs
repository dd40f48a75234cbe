//! Per-request context handed to every controller.
//!
//! A [`Visitor`] carries the authenticated identity (if any), whether the
//! request is a fragment request, the notice queue, and the cookies the
//! response must set. Nothing about the visitor lives in process state.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, HeaderValue, header, request::Parts},
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use scribe_core::{
  notice::{Level, Notice, decode_notices, encode_notices},
  store::BlogStore,
  user::User,
};

use crate::{AppState, auth, cookie, error::Error};

/// Request header set by in-page navigation (htmx).
pub const FRAGMENT_HEADER: &str = "hx-request";

pub struct Visitor {
  pub user:           Option<User>,
  /// Raw session token presented by the client, valid or not.
  pub session_token:  Option<String>,
  /// `true` when only the inner page fragment should be rendered.
  pub fragment:       bool,
  notices:            Vec<Notice>,
  had_notice_cookie:  bool,
  secure_cookies:     bool,
  set_cookies:        Vec<String>,
}

impl Visitor {
  /// An anonymous, full-page visitor with no cookies.
  pub fn anonymous(secure_cookies: bool) -> Self {
    Self {
      user: None,
      session_token: None,
      fragment: false,
      notices: Vec::new(),
      had_notice_cookie: false,
      secure_cookies,
      set_cookies: Vec::new(),
    }
  }

  pub fn user_id(&self) -> Option<i64> { self.user.as_ref().map(|u| u.user_id) }

  /// Queue a notice for the next rendered page.
  pub fn notify(&mut self, level: Level, message: impl Into<String>) {
    self.notices.push(Notice::new(level, message));
  }

  pub fn secure_cookies(&self) -> bool { self.secure_cookies }

  pub fn set_cookie(&mut self, cookie: String) { self.set_cookies.push(cookie); }

  /// Hand every pending notice to a render; the notice cookie is cleared.
  pub(crate) fn take_notices(&mut self) -> Vec<Notice> {
    if self.had_notice_cookie {
      self.had_notice_cookie = false;
      let expired = cookie::expire(cookie::NOTICE_COOKIE, self.secure_cookies);
      self.set_cookies.push(expired);
    }
    std::mem::take(&mut self.notices)
  }

  /// Carry pending notices across a redirect in the notice cookie.
  pub(crate) fn stash_notices(&mut self) -> Result<(), Error> {
    if self.notices.is_empty() {
      return Ok(());
    }
    let encoded = B64.encode(encode_notices(&self.notices)?);
    let stash = cookie::set(cookie::NOTICE_COOKIE, &encoded, None, self.secure_cookies);
    self.set_cookies.push(stash);
    Ok(())
  }

  /// Append the queued `Set-Cookie` headers to `response`.
  pub(crate) fn write_cookies(self, response: &mut Response) {
    for c in self.set_cookies {
      match HeaderValue::from_str(&c) {
        Ok(v) => {
          response.headers_mut().append(header::SET_COOKIE, v);
        }
        Err(e) => tracing::warn!("dropping malformed cookie: {e}"),
      }
    }
  }
}

/// `true` if the fragment marker is present with a truthy value.
pub fn is_fragment(headers: &HeaderMap) -> bool {
  headers
    .get(FRAGMENT_HEADER)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .is_some_and(|v| !v.is_empty() && !v.eq_ignore_ascii_case("false"))
}

fn read_notice_cookie(raw: &str) -> Vec<Notice> {
  let decoded = B64
    .decode(raw)
    .ok()
    .and_then(|bytes| String::from_utf8(bytes).ok());
  match decoded.as_deref().map(decode_notices) {
    Some(Ok(notices)) => notices,
    _ => {
      tracing::debug!("discarding unreadable notice cookie");
      Vec::new()
    }
  }
}

impl<S> FromRequestParts<AppState<S>> for Visitor
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let mut visitor = Visitor::anonymous(state.config.secure_cookies);
    visitor.fragment = is_fragment(&parts.headers);

    if let Some(raw) = cookie::read(&parts.headers, cookie::NOTICE_COOKIE) {
      visitor.notices = read_notice_cookie(&raw);
      visitor.had_notice_cookie = true;
    }

    if let Some(token) = cookie::read(&parts.headers, cookie::SESSION_COOKIE) {
      visitor.user = auth::resolve_session(state, &token).await?;
      if visitor.user.is_none() {
        visitor.set_cookie(cookie::expire(cookie::SESSION_COOKIE, visitor.secure_cookies));
      }
      visitor.session_token = Some(token);
    }

    Ok(visitor)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fragment_marker_values() {
    let mut headers = HeaderMap::new();
    assert!(!is_fragment(&headers));
    headers.insert(FRAGMENT_HEADER, HeaderValue::from_static("true"));
    assert!(is_fragment(&headers));
    headers.insert(FRAGMENT_HEADER, HeaderValue::from_static("false"));
    assert!(!is_fragment(&headers));
    headers.insert(FRAGMENT_HEADER, HeaderValue::from_static(""));
    assert!(!is_fragment(&headers));
  }

  #[test]
  fn stashed_notices_read_back() {
    let mut visitor = Visitor::anonymous(false);
    visitor.notify(Level::Success, "saved");
    visitor.stash_notices().unwrap();

    let header = &visitor.set_cookies[0];
    let value = header
      .strip_prefix("scribe_notices=")
      .and_then(|rest| rest.split(';').next())
      .unwrap();
    assert_eq!(read_notice_cookie(value), vec![Notice::new(Level::Success, "saved")]);
  }

  #[test]
  fn taking_notices_clears_the_cookie_once() {
    let mut visitor = Visitor::anonymous(false);
    visitor.had_notice_cookie = true;
    visitor.notify(Level::Info, "hi");

    assert_eq!(visitor.take_notices().len(), 1);
    assert!(visitor.take_notices().is_empty());
    assert_eq!(visitor.set_cookies.len(), 1);
    assert!(visitor.set_cookies[0].contains("Max-Age=0"));
  }

  #[test]
  fn corrupt_notice_cookie_is_ignored() {
    assert!(read_notice_cookie("%%%").is_empty());
    assert!(read_notice_cookie(&B64.encode("not json")).is_empty());
  }
}
