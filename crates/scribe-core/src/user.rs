//! Identity types: registered users and their login sessions.
//!
//! The web layer owns password hashing and token generation; this module only
//! describes what gets persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:       i64,
  pub username:      String,
  pub email:         String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub joined_at:     DateTime<Utc>,
}

/// Input to [`crate::store::BlogStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
}

/// A server-side login session. The bearer token itself is never stored;
/// sessions are keyed by its SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub token_hash: String,
  pub user_id:    i64,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool { self.expires_at <= now }
}
