//! Core types and trait definitions for the scribe blog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::BlogStore`]; the web layer depends on
//! that abstraction, on the form validators in [`form`], and on the paging
//! rules in [`pagination`].

// Backends implement the store trait with native `async fn`; the `Send` bounds
// live on the trait's declared return types.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod form;
pub mod notice;
pub mod pagination;
pub mod post;
pub mod store;
pub mod user;

pub use error::{Error, Result};
