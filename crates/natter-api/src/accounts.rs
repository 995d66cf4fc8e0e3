//! Handlers for registration, login and contact-list management.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/register` | Body: [`RegisterBody`]; returns the public user |
//! | `POST` | `/login` | Body: [`LoginBody`]; returns the public user |
//! | `POST` | `/addcontact` | Body: [`AddContactBody`] |

use axum::{Json, extract::State};
use natter_core::{
  account::{self, AccountError},
  store::{ChatStore, UserStore},
  user::{NewUser, PublicUser},
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  error::{ApiError, NO_SUCH_USER},
};

/// `{"msg": ...}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct Ack {
  pub msg: &'static str,
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterBody {
  #[serde(default)]
  pub name:     String,
  pub username: String,
  pub email:    String,
  pub password: String,
}

/// `POST /register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<Json<PublicUser>, ApiError>
where
  S: ChatStore + Clone + 'static,
{
  tracing::info!("received POST request on /register");

  account::validate_registration(&body.username, &body.email, &body.password)?;

  if state
    .store
    .find_by_email(&body.email)
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(AccountError::EmailTaken.into());
  }
  if state
    .store
    .find_by_username(&body.username)
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(AccountError::UsernameTaken.into());
  }

  let password_hash = account::hash_password(&body.password)?;
  let user = state
    .store
    .create_user(NewUser {
      username: body.username,
      name: body.name,
      email: body.email,
      password_hash,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(username = %user.username, "registered user");
  Ok(Json(PublicUser::from(&user)))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

/// `POST /login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<PublicUser>, ApiError>
where
  S: ChatStore + Clone + 'static,
{
  tracing::info!("received POST request on /login");

  let user = state
    .store
    .find_by_username(&body.username)
    .await
    .map_err(ApiError::store)?
    .ok_or(AccountError::InvalidCredentials)?;

  if !account::verify_password(&body.password, &user.password_hash) {
    return Err(AccountError::InvalidCredentials.into());
  }
  Ok(Json(PublicUser::from(&user)))
}

// ─── Add contact ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddContactBody {
  pub username:         String,
  pub contact_username: String,
}

/// `POST /addcontact`
pub async fn add_contact<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<AddContactBody>,
) -> Result<Json<Ack>, ApiError>
where
  S: ChatStore + Clone + 'static,
{
  tracing::info!("received POST request on /addcontact");

  if body.username == body.contact_username {
    return Err(ApiError::domain(
      "Contact username same as current user's username",
    ));
  }

  let store = &state.store;
  if store
    .find_by_username(&body.contact_username)
    .await
    .map_err(ApiError::store)?
    .is_none()
  {
    return Err(ApiError::domain(NO_SUCH_USER));
  }

  let user = store
    .find_by_username(&body.username)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::domain(NO_SUCH_USER))?;

  if user.has_contact(&body.contact_username) {
    return Err(ApiError::domain("User already present in contacts list"));
  }

  store
    .add_contact(&user.username, &body.contact_username)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::domain(NO_SUCH_USER))?;

  Ok(Json(Ack { msg: "Contact added successfully!" }))
}
