//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that lexical order matches chronological order.
//! Contact lists are stored as compact JSON arrays.

use chrono::{DateTime, SecondsFormat, Utc};
use natter_core::{message::Message, user::User};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Contacts ─────────────────────────────────────────────────────────────────

pub fn encode_contacts(contacts: &[String]) -> Result<String> {
  Ok(serde_json::to_string(contacts)?)
}

pub fn decode_contacts(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Raw rows ─────────────────────────────────────────────────────────────────

/// Column list matching [`RawUser::from_row`].
pub const USER_COLUMNS: &str = "username, name, email, password_hash, contacts, \
                                is_profile_image_set, profile_image, created_at";

/// A `users` row before decoding.
pub struct RawUser {
  pub username:             String,
  pub name:                 String,
  pub email:                String,
  pub password_hash:        String,
  pub contacts:             String,
  pub is_profile_image_set: bool,
  pub profile_image:        Option<String>,
  pub created_at:           String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawUser {
      username:             row.get(0)?,
      name:                 row.get(1)?,
      email:                row.get(2)?,
      password_hash:        row.get(3)?,
      contacts:             row.get(4)?,
      is_profile_image_set: row.get(5)?,
      profile_image:        row.get(6)?,
      created_at:           row.get(7)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      username:             self.username,
      name:                 self.name,
      email:                self.email,
      password_hash:        self.password_hash,
      contacts:             decode_contacts(&self.contacts)?,
      is_profile_image_set: self.is_profile_image_set,
      profile_image:        self.profile_image,
      created_at:           decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawMessage::from_row`].
pub const MESSAGE_COLUMNS: &str =
  "message_id, from_user, to_user, content, created_at, updated_at, version";

/// A `messages` row before decoding.
pub struct RawMessage {
  pub message_id: String,
  pub from:       String,
  pub to:         String,
  pub content:    String,
  pub created_at: String,
  pub updated_at: String,
  pub version:    u32,
}

impl RawMessage {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawMessage {
      message_id: row.get(0)?,
      from:       row.get(1)?,
      to:         row.get(2)?,
      content:    row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
      version:    row.get(6)?,
    })
  }

  pub fn into_message(self) -> Result<Message> {
    Ok(Message {
      message_id: decode_uuid(&self.message_id)?,
      from:       self.from,
      to:         self.to,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      version:    self.version,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};

  use super::*;

  #[test]
  fn encoded_timestamps_sort_chronologically() {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let earlier = encode_dt(base);
    let later = encode_dt(base + Duration::microseconds(1500));
    assert_eq!(earlier.len(), later.len());
    assert!(earlier < later);
    assert_eq!(decode_dt(&later).unwrap(), base + Duration::microseconds(1500));
  }

  #[test]
  fn contacts_json() {
    let contacts = vec!["bob".to_string(), "carol".to_string()];
    let s = encode_contacts(&contacts).unwrap();
    assert_eq!(s, r#"["bob","carol"]"#);
    assert_eq!(decode_contacts(&s).unwrap(), contacts);
  }
}
