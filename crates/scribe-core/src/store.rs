//! The `BlogStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `scribe-store-sqlite`).
//! The web layer depends on this abstraction, not on any concrete backend.
//! Every method is a single atomic, immediately consistent operation.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  post::{NewPost, Post, PostChanges, PostQuery},
  user::{NewUser, Session, User},
};

/// Abstraction over a blog storage backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait BlogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Returns `None` if the username is already taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Record a session for `user_id`, keyed by the digest of its token.
  fn create_session(
    &self,
    token_hash: String,
    user_id: i64,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  /// Look up a session that has not expired as of `now`.
  fn find_session<'a>(
    &'a self,
    token_hash: &'a str,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + 'a;

  /// Remove a session. Returns `false` if it did not exist.
  fn delete_session<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Drop every session that expired before `now`; returns how many went.
  fn purge_expired_sessions(
    &self,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Persist a new post, allocating a unique slug from its title.
  fn create_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// Retrieve a post by slug regardless of `is_active`.
  fn get_post_by_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + 'a;

  /// Overwrite the editable fields of a post. Slug, author and publication
  /// date are untouched. Returns `None` if the post does not exist.
  fn update_post(
    &self,
    post_id: i64,
    changes: PostChanges,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// Hard-delete a post. Returns `false` if it did not exist.
  fn delete_post(
    &self,
    post_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Posts matching `query`, ascending by `post_id`.
  fn list_posts<'a>(
    &'a self,
    query: &'a PostQuery,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + 'a;

  /// Number of posts matching `query`, ignoring its limit and offset.
  fn count_posts<'a>(
    &'a self,
    query: &'a PostQuery,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;
}
