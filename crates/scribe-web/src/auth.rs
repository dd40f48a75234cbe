//! Identity: password hashing, login sessions, and the sign-in gate.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore};
use scribe_core::{form::Credentials, store::BlogStore, user::User};
use sha2::{Digest, Sha256};

use crate::{AppState, cookie, error::Error, visitor::Visitor};

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// Look up the user named in `creds` and check the password.
pub async fn authenticate<S>(
  state: &AppState<S>,
  creds: &Credentials,
) -> Result<Option<User>, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user = state
    .store
    .find_user_by_username(&creds.username)
    .await
    .map_err(Error::store)?;
  Ok(user.filter(|u| verify_password(&creds.password, &u.password_hash)))
}

// ─── Session tokens ──────────────────────────────────────────────────────────

/// 32 random bytes, hex-encoded.
pub fn new_session_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// The form in which a token is stored: SHA-256, hex-encoded.
pub fn token_digest(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

/// Resolve a session token into its user, ignoring expired sessions.
pub async fn resolve_session<S>(state: &AppState<S>, token: &str) -> Result<Option<User>, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let digest = token_digest(token);
  let Some(session) = state
    .store
    .find_session(&digest, Utc::now())
    .await
    .map_err(Error::store)?
  else {
    return Ok(None);
  };
  state.store.get_user(session.user_id).await.map_err(Error::store)
}

/// Log `user` in: any session the visitor already presented is discarded and
/// a fresh one is issued.
pub async fn start_session<S>(
  state: &AppState<S>,
  visitor: &mut Visitor,
  user: &User,
) -> Result<(), Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if let Some(old) = visitor.session_token.take() {
    state.store.delete_session(&token_digest(&old)).await.map_err(Error::store)?;
  }

  let hours = state.config.session_ttl_hours;
  let ttl = Duration::try_hours(hours)
    .filter(|ttl| *ttl > Duration::zero())
    .ok_or(Error::SessionTtl(hours))?;
  let expires_at = Utc::now().checked_add_signed(ttl).ok_or(Error::SessionTtl(hours))?;
  let token = new_session_token();
  state
    .store
    .create_session(token_digest(&token), user.user_id, expires_at)
    .await
    .map_err(Error::store)?;

  let secure = visitor.secure_cookies();
  visitor.set_cookie(cookie::set(
    cookie::SESSION_COOKIE,
    &token,
    Some(ttl.num_seconds()),
    secure,
  ));
  visitor.session_token = Some(token);
  visitor.user = Some(user.clone());
  Ok(())
}

/// Log the visitor out. Succeeds whether or not a session existed.
pub async fn end_session<S>(state: &AppState<S>, visitor: &mut Visitor) -> Result<(), Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if let Some(token) = visitor.session_token.take() {
    state.store.delete_session(&token_digest(&token)).await.map_err(Error::store)?;
    let secure = visitor.secure_cookies();
    visitor.set_cookie(cookie::expire(cookie::SESSION_COOKIE, secure));
  }
  visitor.user = None;
  Ok(())
}

// ─── Gate ────────────────────────────────────────────────────────────────────

/// Present in a handler means the request carries an authenticated identity.
/// Otherwise extraction fails with [`Error::LoginRequired`], which redirects to
/// the login page before the handler runs.
pub struct SignedIn {
  pub visitor: Visitor,
  pub user:    User,
}

impl<S> FromRequestParts<AppState<S>> for SignedIn
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let visitor = Visitor::from_request_parts(parts, state).await?;
    let user = visitor.user.clone().ok_or(Error::LoginRequired)?;
    Ok(SignedIn { visitor, user })
  }
}
