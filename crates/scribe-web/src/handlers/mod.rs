//! Page controllers.
//!
//! Each controller is a plain axum handler generic over the store. Gated
//! controllers take [`crate::auth::SignedIn`]; everything else takes a
//! [`crate::visitor::Visitor`]. Pages go through [`crate::page::render`],
//! state changes end in [`crate::page::redirect`].

pub mod account;
pub mod pages;
pub mod posts;
