//! Handler for `GET /contacts/{username}`.
//!
//! Returns the requesting user's contacts, each with a preview of the latest
//! message exchanged with them, newest conversation first. See
//! [`natter_core::feed`] for the ordering rules.

use axum::{
  Json,
  extract::{Path, State},
};
use natter_core::{
  feed::{ContactFeed, ContactSummary},
  store::ChatStore,
};

use crate::{AppState, error::ApiError};

/// `GET /contacts/{username}`
pub async fn feed<S>(
  State(state): State<AppState<S>>,
  Path(username): Path<String>,
) -> Result<Json<Vec<ContactSummary>>, ApiError>
where
  S: ChatStore + Clone + 'static,
{
  tracing::info!("received GET request on /contacts/{username}");

  let summaries = ContactFeed::new(&*state.store, &*state.store, &*state.cipher)
    .for_user(&username)
    .await?;
  Ok(Json(summaries))
}
