//! [`SqliteStore`], the SQLite implementation of [`BlogStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, types::Value};

use scribe_core::{
  post::{NewPost, Post, PostChanges, PostQuery, slug_base, slug_candidate},
  store::BlogStore,
  user::{NewUser, Session, User},
};

use crate::{
  Error, Result,
  encode::{
    POST_COLUMNS, RawPost, RawSession, RawUser, USER_COLUMNS, encode_date, encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A blog store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a single post row (joined with its author) by primary key.
  async fn post_by_id(&self, post_id: i64) -> Result<Option<Post>> {
    let sql = format!(
      "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.user_id = p.author_id
       WHERE p.post_id = ?1"
    );
    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![post_id], RawPost::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawPost::into_post).transpose()
  }

  async fn user_where(&self, column: &'static str, value: Value) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawUser::into_user).transpose()
  }
}

/// Build the `WHERE` clause and its positional parameters for `query`.
fn post_filter(query: &PostQuery) -> (String, Vec<Value>) {
  let mut conds: Vec<String> = vec![];
  let mut params: Vec<Value> = vec![];

  if query.active_only {
    conds.push("p.is_active = 1".to_owned());
  }
  if let Some(author) = query.author_id {
    params.push(Value::Integer(author));
    conds.push(format!("p.author_id = ?{}", params.len()));
  }
  if let Some(excluded) = query.exclude_author {
    params.push(Value::Integer(excluded));
    conds.push(format!("p.author_id != ?{}", params.len()));
  }

  let where_clause = if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  };
  (where_clause, params)
}

// ─── BlogStore impl ──────────────────────────────────────────────────────────

impl BlogStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    let joined_at = encode_dt(Utc::now());

    let user_id: Option<i64> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO users (username, email, password_hash, joined_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (username) DO NOTHING",
          rusqlite::params![input.username, input.email, input.password_hash, joined_at],
        )?;
        Ok((inserted == 1).then(|| conn.last_insert_rowid()))
      })
      .await?;

    match user_id {
      Some(id) => Ok(Some(self.get_user(id).await?.ok_or(Error::Vanished("user"))?)),
      None => Ok(None),
    }
  }

  async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
    self.user_where("user_id", Value::Integer(user_id)).await
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    self.user_where("username", Value::Text(username.to_owned())).await
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(
    &self,
    token_hash: String,
    user_id:    i64,
    expires_at: DateTime<Utc>,
  ) -> Result<Session> {
    let session = Session { token_hash, user_id, created_at: Utc::now(), expires_at };

    let hash_str    = session.token_hash.clone();
    let created_str = encode_dt(session.created_at);
    let expires_str = encode_dt(session.expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![hash_str, user_id, created_str, expires_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(session)
  }

  async fn find_session(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<Session>> {
    let hash_str = token_hash.to_owned();
    let now_str  = encode_dt(now);

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT token_hash, user_id, created_at, expires_at FROM sessions
               WHERE token_hash = ?1 AND expires_at > ?2",
              rusqlite::params![hash_str, now_str],
              |row| {
                Ok(RawSession {
                  token_hash: row.get(0)?,
                  user_id:    row.get(1)?,
                  created_at: row.get(2)?,
                  expires_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSession::into_session).transpose()
  }

  async fn delete_session(&self, token_hash: &str) -> Result<bool> {
    let hash_str = token_hash.to_owned();
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM sessions WHERE token_hash = ?1", rusqlite::params![hash_str])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize> {
    let now_str = encode_dt(now);
    let purged = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", rusqlite::params![now_str])?)
      })
      .await?;
    Ok(purged)
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn create_post(&self, input: NewPost) -> Result<Post> {
    let base          = slug_base(&input.title);
    let published_str = encode_date(input.published_at);
    let created_str   = encode_dt(Utc::now());

    let post_id: i64 = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Probe candidates until one is free; the dedicated connection thread
        // runs this whole closure before any other call.
        let mut attempt = 1;
        let slug = loop {
          let candidate = slug_candidate(&base, attempt);
          let taken = tx
            .query_row(
              "SELECT 1 FROM posts WHERE slug = ?1",
              rusqlite::params![candidate],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          if !taken {
            break candidate;
          }
          attempt += 1;
        };

        tx.execute(
          "INSERT INTO posts (title, content, slug, author_id, is_active, published_at, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            input.title,
            input.content,
            slug,
            input.author_id,
            input.is_active,
            published_str,
            created_str,
          ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
      })
      .await?;

    self.post_by_id(post_id).await?.ok_or(Error::Vanished("post"))
  }

  async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
    let slug_str = slug.to_owned();
    let sql = format!(
      "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.user_id = p.author_id
       WHERE p.slug = ?1"
    );
    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![slug_str], RawPost::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawPost::into_post).transpose()
  }

  async fn update_post(&self, post_id: i64, changes: PostChanges) -> Result<Option<Post>> {
    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE posts SET title = ?1, content = ?2, is_active = ?3 WHERE post_id = ?4",
          rusqlite::params![changes.title, changes.content, changes.is_active, post_id],
        )?)
      })
      .await?;

    if updated == 0 {
      return Ok(None);
    }
    self.post_by_id(post_id).await
  }

  async fn delete_post(&self, post_id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM posts WHERE post_id = ?1", rusqlite::params![post_id])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>> {
    let (where_clause, mut params) = post_filter(query);
    params.push(Value::Integer(query.limit.map_or(-1, |l| l as i64)));
    let limit_idx = params.len();
    params.push(Value::Integer(query.offset.unwrap_or(0) as i64));
    let offset_idx = params.len();

    let sql = format!(
      "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.user_id = p.author_id
       {where_clause}
       ORDER BY p.post_id ASC
       LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
    );

    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn count_posts(&self, query: &PostQuery) -> Result<usize> {
    let (where_clause, params) = post_filter(query);
    let sql = format!("SELECT COUNT(*) FROM posts p {where_clause}");

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, rusqlite::params_from_iter(params.iter()), |r| r.get(0))?)
      })
      .await?;

    Ok(count as usize)
  }
}
