//! [`SqliteStore`]: the SQLite implementation of [`UserStore`] and
//! [`MessageStore`].

use std::{collections::HashSet, path::Path};

use chrono::{SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use natter_core::{
  message::{Message, NewMessage},
  store::{MessageStore, UserStore},
  user::{ContactCard, NewUser, ProfileUpdate, User},
};

use crate::{
  Result,
  encode::{
    MESSAGE_COLUMNS, RawMessage, RawUser, USER_COLUMNS, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Natter user and message store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a single user by an arbitrary unique column.
  async fn find_user_where(
    &self,
    column: &'static str,
    value: String,
  ) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  /// Run an `UPDATE ... WHERE username = ?1` binding `values` to `?2..`, and
  /// re-read the user if a row was touched.
  async fn update_user(
    &self,
    username: &str,
    sql: &'static str,
    values: Vec<Option<String>>,
  ) -> Result<Option<User>> {
    let name = username.to_owned();
    let changed = self
      .conn
      .call(move |conn| {
        let params = std::iter::once(Some(name)).chain(values);
        Ok(conn.execute(sql, rusqlite::params_from_iter(params))?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.find_user_where("username", username.to_owned()).await
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = crate::Error;

  async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
    self.find_user_where("username", username.to_owned()).await
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
    self.find_user_where("email", email.to_owned()).await
  }

  async fn find_many_by_username(
    &self,
    usernames: &[String],
  ) -> Result<Vec<ContactCard>> {
    let mut seen = HashSet::new();
    let wanted: Vec<String> = usernames
      .iter()
      .filter(|u| seen.insert(u.as_str()))
      .cloned()
      .collect();

    let cards = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT name, username, is_profile_image_set, profile_image
           FROM users WHERE username = ?1",
        )?;

        let mut cards = Vec::with_capacity(wanted.len());
        for username in &wanted {
          let card = stmt
            .query_row(rusqlite::params![username], |row| {
              Ok(ContactCard {
                name:                 row.get(0)?,
                username:             row.get(1)?,
                is_profile_image_set: row.get(2)?,
                profile_image:        row.get(3)?,
              })
            })
            .optional()?;
          cards.extend(card);
        }
        Ok(cards)
      })
      .await?;

    Ok(cards)
  }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      username:             input.username,
      name:                 input.name,
      email:                input.email,
      password_hash:        input.password_hash,
      contacts:             Vec::new(),
      is_profile_image_set: false,
      profile_image:        None,
      created_at:           Utc::now().trunc_subsecs(6),
    };

    let username = user.username.clone();
    let name     = user.name.clone();
    let email    = user.email.clone();
    let hash     = user.password_hash.clone();
    let at_str   = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (username, name, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![username, name, email, hash, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn add_contact(&self, username: &str, contact: &str) -> Result<Option<User>> {
    // Single statement, so the append is atomic per user row.
    self
      .update_user(
        username,
        "UPDATE users SET contacts = json_insert(contacts, '$[#]', ?2)
         WHERE username = ?1",
        vec![Some(contact.to_owned())],
      )
      .await
  }

  async fn update_profile(
    &self,
    username: &str,
    update: ProfileUpdate,
  ) -> Result<Option<User>> {
    self
      .update_user(
        username,
        "UPDATE users SET name = COALESCE(?2, name), email = COALESCE(?3, email)
         WHERE username = ?1",
        vec![update.name, update.email],
      )
      .await
  }

  async fn set_profile_image(
    &self,
    username: &str,
    image_base64: String,
  ) -> Result<Option<User>> {
    self
      .update_user(
        username,
        "UPDATE users SET is_profile_image_set = 1, profile_image = ?2
         WHERE username = ?1",
        vec![Some(image_base64)],
      )
      .await
  }

  async fn search_by_prefix(&self, prefix: &str) -> Result<Vec<ContactCard>> {
    let prefix = prefix.to_owned();

    let cards = self
      .conn
      .call(move |conn| {
        // substr() rather than LIKE: literal and case-sensitive.
        let mut stmt = conn.prepare(
          "SELECT name, username, is_profile_image_set, profile_image
           FROM users
           WHERE substr(username, 1, length(?1)) = ?1
           ORDER BY username",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![prefix], |row| {
            Ok(ContactCard {
              name:                 row.get(0)?,
              username:             row.get(1)?,
              is_profile_image_set: row.get(2)?,
              profile_image:        row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(cards)
  }
}

// ─── MessageStore impl ───────────────────────────────────────────────────────

impl MessageStore for SqliteStore {
  type Error = crate::Error;

  async fn find_latest_between(&self, a: &str, b: &str) -> Result<Option<Message>> {
    let a = a.to_owned();
    let b = b.to_owned();

    let raw: Option<RawMessage> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {MESSAGE_COLUMNS} FROM messages
           WHERE (from_user = ?1 AND to_user = ?2)
              OR (from_user = ?2 AND to_user = ?1)
           ORDER BY created_at DESC, rowid DESC
           LIMIT 1"
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![a, b], RawMessage::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMessage::into_message).transpose()
  }

  async fn record_message(&self, input: NewMessage) -> Result<Message> {
    let created_at = input.created_at.unwrap_or_else(Utc::now).trunc_subsecs(6);
    let message = Message {
      message_id: Uuid::new_v4(),
      from:       input.from,
      to:         input.to,
      content:    input.content,
      created_at,
      updated_at: created_at,
      version:    0,
    };

    let id_str  = encode_uuid(message.message_id);
    let from    = message.from.clone();
    let to      = message.to.clone();
    let content = message.content.clone();
    let at_str  = encode_dt(message.created_at);
    let version = message.version;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO messages
             (message_id, from_user, to_user, content, created_at, updated_at, version)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?6)",
          rusqlite::params![id_str, from, to, content, at_str, version],
        )?;
        Ok(())
      })
      .await?;

    Ok(message)
  }
}
