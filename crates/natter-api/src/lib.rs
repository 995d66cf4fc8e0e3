//! JSON HTTP API for Natter.
//!
//! Exposes an axum [`Router`] backed by any [`ChatStore`]. TLS and auth
//! hardening are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = natter_api::AppState::new(store, &config);
//! axum::serve(listener, natter_api::router(state)).await?;
//! ```

pub mod accounts;
pub mod contacts;
pub mod error;
pub mod profile;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use natter_core::{cipher::AesCipher, store::ChatStore};
use serde::Deserialize;

pub use error::ApiError;

/// Upper bound on request bodies; profile images travel inline as base64.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised once at startup.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub store_path:    PathBuf,
  /// Shared secret the message cipher key is derived from.
  pub cipher_secret: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ChatStore> {
  pub store:  Arc<S>,
  pub cipher: Arc<AesCipher>,
}

impl<S: ChatStore> AppState<S> {
  pub fn new(store: S, config: &ServerConfig) -> Self {
    Self {
      store:  Arc::new(store),
      cipher: Arc::new(AesCipher::new(&config.cipher_secret)),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ChatStore + Clone + 'static,
{
  Router::new()
    // Accounts
    .route("/register", post(accounts::register::<S>))
    .route("/login", post(accounts::login::<S>))
    .route("/addcontact", post(accounts::add_contact::<S>))
    // Contact feed
    .route("/contacts/{username}", get(contacts::feed::<S>))
    // Profiles
    .route("/profile", post(profile::update::<S>))
    .route("/profile/{username}", get(profile::get_one::<S>))
    .route("/search/{prefix}", get(profile::search::<S>))
    .route("/uploadimage", post(profile::upload_image::<S>))
    .route("/profileimage/{username}", get(profile::image::<S>))
    .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
