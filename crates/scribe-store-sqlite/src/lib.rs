//! SQLite backend for the scribe blog.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Because that thread executes one call at
//! a time, every [`scribe_core::store::BlogStore`] method is atomic.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
