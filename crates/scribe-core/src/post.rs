//! Post types: the single content entity of the blog.
//!
//! A post's `slug` and `author_id` are fixed when it is created. Only
//! `title`, `content` and `is_active` change afterwards, and only through
//! [`PostChanges`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Longest slug base derived from a title, before any collision suffix.
pub const MAX_SLUG_LEN: usize = 50;

/// Slug used when a title contains nothing URL-safe.
const FALLBACK_SLUG: &str = "post";

// ─── Post ────────────────────────────────────────────────────────────────────

/// A persisted blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  /// Store-assigned, monotonically increasing; doubles as creation order.
  pub post_id:      i64,
  pub title:        String,
  pub content:      String,
  /// Unique, URL-safe, derived from the title at creation and never changed.
  pub slug:         String,
  pub author_id:    i64,
  /// The author's username, joined in for display.
  pub author_name:  String,
  pub is_active:    bool,
  /// Date-only publication stamp set at creation.
  pub published_at: NaiveDate,
  pub created_at:   DateTime<Utc>,
}

impl Post {
  pub fn is_authored_by(&self, user_id: i64) -> bool { self.author_id == user_id }
}

// ─── NewPost ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::BlogStore::create_post`].
/// The slug is allocated by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewPost {
  pub title:        String,
  pub content:      String,
  pub is_active:    bool,
  pub author_id:    i64,
  pub published_at: NaiveDate,
}

// ─── PostChanges ─────────────────────────────────────────────────────────────

/// The editable subset of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
  pub title:     String,
  pub content:   String,
  pub is_active: bool,
}

// ─── Listing query ───────────────────────────────────────────────────────────

/// Parameters for [`crate::store::BlogStore::list_posts`] and
/// [`crate::store::BlogStore::count_posts`]. Results are always ordered by
/// ascending `post_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
  /// Only posts with `is_active = true`.
  pub active_only:    bool,
  /// Only posts written by this user.
  pub author_id:      Option<i64>,
  /// Skip posts written by this user.
  pub exclude_author: Option<i64>,
  pub limit:          Option<usize>,
  pub offset:         Option<usize>,
}

impl PostQuery {
  /// The public feed: active posts, minus the viewer's own when signed in.
  pub fn feed(viewer: Option<i64>) -> Self {
    Self { active_only: true, exclude_author: viewer, ..Self::default() }
  }

  /// Everything one author has written, active or not.
  pub fn by_author(author_id: i64) -> Self {
    Self { author_id: Some(author_id), ..Self::default() }
  }
}

// ─── Slugs ───────────────────────────────────────────────────────────────────

/// Derive the base slug for `title`.
pub fn slug_base(title: &str) -> String {
  let slug = slug::slugify(title);
  let truncated: String = slug.chars().take(MAX_SLUG_LEN).collect();
  let trimmed = truncated.trim_end_matches('-');
  if trimmed.is_empty() {
    FALLBACK_SLUG.to_owned()
  } else {
    trimmed.to_owned()
  }
}

/// The `attempt`-th slug candidate for `base`: the base itself first, then
/// `base-2`, `base-3`, …
pub fn slug_candidate(base: &str, attempt: usize) -> String {
  if attempt <= 1 {
    base.to_owned()
  } else {
    format!("{base}-{attempt}")
  }
}
