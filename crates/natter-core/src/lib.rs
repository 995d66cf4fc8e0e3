//! Core types and trait definitions for the Natter messaging backend.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the domain model, the store traits, the message cipher, and the contact
//! feed aggregation that sits on top of them.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod cipher;
pub mod error;
pub mod feed;
pub mod message;
pub mod store;
pub mod time_label;
pub mod user;

pub use error::{Error, Result};
