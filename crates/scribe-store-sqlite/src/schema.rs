//! SQL schema for the scribe SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    joined_at     TEXT NOT NULL    -- RFC 3339 UTC
);

-- Keyed by the SHA-256 hex digest of the bearer token; the token itself is
-- never stored.
CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,
    user_id    INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

-- AUTOINCREMENT keeps post_id strictly increasing, so it doubles as
-- creation order even after deletions.
CREATE TABLE IF NOT EXISTS posts (
    post_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    content      TEXT NOT NULL,
    slug         TEXT NOT NULL UNIQUE,
    author_id    INTEGER NOT NULL REFERENCES users(user_id),
    is_active    INTEGER NOT NULL DEFAULT 1,
    published_at TEXT NOT NULL,    -- YYYY-MM-DD
    created_at   TEXT NOT NULL     -- RFC 3339 UTC
);

CREATE INDEX IF NOT EXISTS posts_author_idx    ON posts(author_id);
CREATE INDEX IF NOT EXISTS sessions_expiry_idx ON sessions(expires_at);

PRAGMA user_version = 1;
";
