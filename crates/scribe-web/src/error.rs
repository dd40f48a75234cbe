//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::routes::Route;

#[derive(Debug, Error)]
pub enum Error {
  /// A gated route was requested without an authenticated identity.
  #[error("login required")]
  LoginRequired,
  /// Authenticated, but not the owner of the target post.
  #[error("forbidden")]
  Forbidden,
  #[error("not found")]
  NotFound,
  #[error("{0}")]
  Core(#[from] scribe_core::Error),
  #[error("template error: {0}")]
  Template(String),
  #[error("password hash error: {0}")]
  PasswordHash(String),
  #[error("session lifetime of {0} hours is out of range")]
  SessionTtl(i64),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::LoginRequired => Redirect::to(&Route::Login.path()).into_response(),
      Error::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
      Error::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
      Error::Core(scribe_core::Error::Serialization(e)) => internal(&e),
      // Bad `?page=` / `?size=` values surface as a missing page.
      Error::Core(e) => {
        tracing::debug!("rejecting page request: {e}");
        (StatusCode::NOT_FOUND, "Not Found").into_response()
      }
      e @ (Error::Template(_) | Error::PasswordHash(_) | Error::SessionTtl(_) | Error::Store(_)) => {
        internal(&e)
      }
    }
  }
}

fn internal(e: &dyn std::error::Error) -> Response {
  tracing::error!("request failed: {e}");
  (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
