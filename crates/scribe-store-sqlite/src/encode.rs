//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings so that SQL text
//! comparison matches chronological order. Dates are stored as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use scribe_core::{
  post::Post,
  user::{Session, User},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Columns selected for every post read, in [`RawPost::from_row`] order.
pub const POST_COLUMNS: &str = "p.post_id, p.title, p.content, p.slug, p.author_id,
   u.username, p.is_active, p.published_at, p.created_at";

/// Raw values read directly from a `posts` row joined with its author.
pub struct RawPost {
  pub post_id:      i64,
  pub title:        String,
  pub content:      String,
  pub slug:         String,
  pub author_id:    i64,
  pub author_name:  String,
  pub is_active:    bool,
  pub published_at: String,
  pub created_at:   String,
}

impl RawPost {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      post_id:      row.get(0)?,
      title:        row.get(1)?,
      content:      row.get(2)?,
      slug:         row.get(3)?,
      author_id:    row.get(4)?,
      author_name:  row.get(5)?,
      is_active:    row.get(6)?,
      published_at: row.get(7)?,
      created_at:   row.get(8)?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:      self.post_id,
      title:        self.title,
      content:      self.content,
      slug:         self.slug,
      author_id:    self.author_id,
      author_name:  self.author_name,
      is_active:    self.is_active,
      published_at: decode_date(&self.published_at)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

pub const USER_COLUMNS: &str = "user_id, username, email, password_hash, joined_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:       i64,
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub joined_at:     String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      username:      row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      joined_at:     row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       self.user_id,
      username:      self.username,
      email:         self.email,
      password_hash: self.password_hash,
      joined_at:     decode_dt(&self.joined_at)?,
    })
  }
}

/// Raw values read directly from a `sessions` row.
pub struct RawSession {
  pub token_hash: String,
  pub user_id:    i64,
  pub created_at: String,
  pub expires_at: String,
}

impl RawSession {
  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      token_hash: self.token_hash,
      user_id:    self.user_id,
      created_at: decode_dt(&self.created_at)?,
      expires_at: decode_dt(&self.expires_at)?,
    })
  }
}
