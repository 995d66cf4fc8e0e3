//! Handlers for profile data, profile images and user search.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/profile/{username}` | Profile with `total_chats` |
//! | `POST` | `/profile` | Body: [`UpdateProfileBody`]; name/email only |
//! | `GET`  | `/search/{prefix}` | Cards of users whose username starts with `prefix` |
//! | `POST` | `/uploadimage` | Body: [`UploadImageBody`]; PNG or JPEG, base64 |
//! | `GET`  | `/profileimage/{username}` | HTML `<img>` with a data URI |

use axum::{
  Json,
  extract::{Path, State},
  response::Html,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use natter_core::{
  account::{self, AccountError},
  store::{ChatStore, UserStore},
  user::{ContactCard, Profile, ProfileUpdate, PublicUser},
};
use serde::Deserialize;

use crate::{
  AppState,
  accounts::Ack,
  error::{ApiError, NO_SUCH_USER},
};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff";

// ─── Profile ──────────────────────────────────────────────────────────────────

/// `GET /profile/{username}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(username): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
  S: ChatStore + Clone + 'static,
{
  tracing::info!("received GET request on /profile/{username}");

  let user = state
    .store
    .find_by_username(&username)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::domain(NO_SUCH_USER))?;
  Ok(Json(user.profile()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileBody {
  pub username: String,
  #[serde(flatten)]
  pub update:   ProfileUpdate,
}

/// `POST /profile`: updates the display fields present in the body.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<UpdateProfileBody>,
) -> Result<Json<PublicUser>, ApiError>
where
  S: ChatStore + Clone + 'static,
{
  tracing::info!("received POST request on /profile");

  if let Some(email) = &body.update.email {
    account::validate_email(email)?;
    let holder = state
      .store
      .find_by_email(email)
      .await
      .map_err(ApiError::store)?;
    if holder.is_some_and(|u| u.username != body.username) {
      return Err(AccountError::EmailTaken.into());
    }
  }

  let user = state
    .store
    .update_profile(&body.username, body.update)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::domain(NO_SUCH_USER))?;
  Ok(Json(PublicUser::from(&user)))
}

// ─── Search ───────────────────────────────────────────────────────────────────

/// `GET /search/{prefix}`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  Path(prefix): Path<String>,
) -> Result<Json<Vec<ContactCard>>, ApiError>
where
  S: ChatStore + Clone + 'static,
{
  tracing::info!("received GET request on /search/{prefix}");

  let cards = state
    .store
    .search_by_prefix(&prefix)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(cards))
}

// ─── Images ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UploadImageBody {
  pub username: String,
  /// Base64 of the raw file bytes.
  pub image:    String,
}

/// `POST /uploadimage`
pub async fn upload_image<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<UploadImageBody>,
) -> Result<Json<Ack>, ApiError>
where
  S: ChatStore + Clone + 'static,
{
  tracing::info!("received POST request on /uploadimage");

  if body.image.trim().is_empty() {
    return Err(ApiError::domain("Please upload a file!"));
  }
  let bytes = B64
    .decode(body.image.trim())
    .map_err(|_| ApiError::domain("Please upload a valid file!"))?;
  if !is_supported_image(&bytes) {
    return Err(ApiError::domain("Please upload a valid file!"));
  }

  state
    .store
    .set_profile_image(&body.username, B64.encode(&bytes))
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::domain("User not found!"))?;

  Ok(Json(Ack { msg: "Image saved successfully!" }))
}

/// `GET /profileimage/{username}`
pub async fn image<S>(
  State(state): State<AppState<S>>,
  Path(username): Path<String>,
) -> Result<Html<String>, ApiError>
where
  S: ChatStore + Clone + 'static,
{
  tracing::info!("received GET request on /profileimage/{username}");

  let user = state
    .store
    .find_by_username(&username)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::domain("No such user found!"))?;

  let data = user.profile_image.unwrap_or_default();
  Ok(Html(format!("<img src=\"data:image/png;base64,{data}\" >")))
}

fn is_supported_image(bytes: &[u8]) -> bool {
  bytes.starts_with(PNG_MAGIC) || bytes.starts_with(JPEG_MAGIC)
}
