//! The contact feed: one entry per contact, each carrying a preview of the
//! latest message exchanged with the requesting user, ordered by true message
//! recency.
//!
//! Contacts without any message sort after every contact that has one. Ties
//! (equal timestamps, or no message on either side) keep the order of the
//! requesting user's contact list.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{
  cipher::{CipherError, MessageCipher},
  store::{MessageStore, UserStore},
  time_label::relative_label,
  user::ContactCard,
};

/// Decrypted bodies longer than this many characters are shortened.
pub const PREVIEW_MAX_CHARS: usize = 30;
/// Characters kept from a shortened body, before [`ELLIPSIS`].
pub const PREVIEW_KEEP_CHARS: usize = 28;
pub const ELLIPSIS: &str = "...";

// ─── Views ────────────────────────────────────────────────────────────────────

/// Preview of the latest message between two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestMessage {
  pub content: String,
  /// Relative-time label, see [`relative_label`].
  pub time:    String,
}

impl LatestMessage {
  /// Placeholder for a pair that has never exchanged a message.
  pub fn empty() -> Self {
    Self { content: String::new(), time: String::new() }
  }
}

/// One row of the contact feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSummary {
  pub name:                 String,
  pub username:             String,
  #[serde(rename = "isProfileImageSet")]
  pub is_profile_image_set: bool,
  #[serde(rename = "profileImage")]
  pub profile_image:        Option<String>,
  pub latest_msg:           LatestMessage,
}

impl ContactSummary {
  fn new(card: ContactCard, latest_msg: LatestMessage) -> Self {
    Self {
      name: card.name,
      username: card.username,
      is_profile_image_set: card.is_profile_image_set,
      profile_image: card.profile_image,
      latest_msg,
    }
  }
}

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FeedError {
  /// The requesting user does not exist. Reported to the client, not a fault.
  #[error("No such user exists!")]
  UnknownUser { username: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Cipher(#[from] CipherError),
}

impl FeedError {
  fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    FeedError::Store(Box::new(e))
  }
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Builds contact feeds from a user store, a message store and a cipher.
///
/// Borrowed per request; holds no state of its own.
pub struct ContactFeed<'a, U, M, C> {
  users:    &'a U,
  messages: &'a M,
  cipher:   &'a C,
}

impl<'a, U, M, C> ContactFeed<'a, U, M, C>
where
  U: UserStore,
  M: MessageStore,
  C: MessageCipher,
{
  pub fn new(users: &'a U, messages: &'a M, cipher: &'a C) -> Self {
    Self { users, messages, cipher }
  }

  /// Feed for `username`, labelled relative to the current time.
  pub async fn for_user(
    &self,
    username: &str,
  ) -> Result<Vec<ContactSummary>, FeedError> {
    self.for_user_at(username, Utc::now()).await
  }

  /// Feed for `username`, labelled relative to `now`.
  ///
  /// Lookups run one contact at a time. Any store or decryption failure
  /// aborts the whole feed.
  pub async fn for_user_at(
    &self,
    username: &str,
    now: DateTime<Utc>,
  ) -> Result<Vec<ContactSummary>, FeedError> {
    let user = self
      .users
      .find_by_username(username)
      .await
      .map_err(FeedError::store)?
      .ok_or_else(|| FeedError::UnknownUser { username: username.to_owned() })?;

    let cards = self
      .users
      .find_many_by_username(&user.contacts)
      .await
      .map_err(FeedError::store)?;

    let mut entries = Vec::with_capacity(cards.len());
    for card in cards {
      let latest = self
        .messages
        .find_latest_between(&user.username, &card.username)
        .await
        .map_err(FeedError::store)?;

      let (sent_at, latest_msg) = match latest {
        Some(msg) => {
          let text = self.cipher.decrypt(&msg.content)?;
          let preview = LatestMessage {
            content: preview(&text),
            time:    relative_label(now, msg.created_at),
          };
          (Some(msg.created_at), preview)
        }
        None => (None, LatestMessage::empty()),
      };

      entries.push((sent_at, ContactSummary::new(card, latest_msg)));
    }

    rank_by_recency(&mut entries);

    tracing::debug!(username, contacts = entries.len(), "built contact feed");
    Ok(entries.into_iter().map(|(_, summary)| summary).collect())
  }
}

/// Shorten a decrypted body to at most [`PREVIEW_MAX_CHARS`] characters.
pub fn preview(text: &str) -> String {
  if text.chars().count() <= PREVIEW_MAX_CHARS {
    return text.to_owned();
  }
  let mut short: String = text.chars().take(PREVIEW_KEEP_CHARS).collect();
  short.push_str(ELLIPSIS);
  short
}

/// Newest first, message-less entries last. The sort is stable.
fn rank_by_recency<T>(entries: &mut [(Option<DateTime<Utc>>, T)]) {
  // `None < Some(_)`, so reversing puts `None` at the end.
  entries.sort_by_key(|(sent_at, _)| Reverse(*sent_at));
}
