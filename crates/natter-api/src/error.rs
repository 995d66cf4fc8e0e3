//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Two tiers. Domain failures ("no such user", "invalid email", ...) are
//! ordinary answers: they render as `200 OK` with an `{"error": ...}` body and
//! clients inspect the payload shape. Everything else is a fault and renders
//! as `500`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use natter_core::{account::AccountError, cipher::CipherError, feed::FeedError};
use serde_json::json;
use thiserror::Error;

pub const NO_SUCH_USER: &str = "No such user exists!";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Expected failure reported inside a successful response.
  #[error("{0}")]
  Domain(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Cipher(#[from] CipherError),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  pub fn domain(message: impl Into<String>) -> Self { ApiError::Domain(message.into()) }

  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    ApiError::Store(Box::new(e))
  }
}

impl From<AccountError> for ApiError {
  fn from(e: AccountError) -> Self { ApiError::Domain(e.to_string()) }
}

impl From<FeedError> for ApiError {
  fn from(e: FeedError) -> Self {
    match e {
      FeedError::UnknownUser { .. } => ApiError::Domain(e.to_string()),
      FeedError::Store(inner) => ApiError::Store(inner),
      FeedError::Cipher(inner) => ApiError::Cipher(inner),
    }
  }
}

impl From<natter_core::Error> for ApiError {
  fn from(e: natter_core::Error) -> Self { ApiError::Internal(e.to_string()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Domain(m) => {
        tracing::debug!(error = %m, "domain error");
        StatusCode::OK
      }
      other => {
        tracing::error!(error = %other, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  async fn render(e: ApiError) -> (StatusCode, serde_json::Value) {
    let resp = e.into_response();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn domain_errors_are_200() {
    let (status, body) = render(AccountError::InvalidEmail.into()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error": "Invalid email!" }));
  }

  #[tokio::test]
  async fn unknown_feed_user_is_a_domain_error() {
    let e: ApiError = FeedError::UnknownUser { username: "ghost".into() }.into();
    let (status, body) = render(e).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error": NO_SUCH_USER }));
  }

  #[tokio::test]
  async fn decryption_failures_are_500() {
    let e: ApiError = FeedError::Cipher(CipherError::Decryption("bad".into())).into();
    let (status, _) = render(e).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  }
}
