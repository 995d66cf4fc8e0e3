//! Messages exchanged between two users.
//!
//! Message bodies are ciphertext at rest. They are only decrypted on the way
//! out, inside the contact feed.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A stored message. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
  pub message_id: Uuid,
  pub from:       String,
  pub to:         String,
  /// Ciphertext as produced by a [`MessageCipher`](crate::cipher::MessageCipher).
  pub content:    String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  /// Record format version.
  pub version:    u32,
}

impl Message {
  /// `true` if this message was exchanged between `a` and `b`, in either
  /// direction.
  pub fn is_between(&self, a: &str, b: &str) -> bool {
    (self.from == a && self.to == b) || (self.from == b && self.to == a)
  }
}

/// Input to [`MessageStore::record_message`](crate::store::MessageStore::record_message).
#[derive(Debug, Clone)]
pub struct NewMessage {
  pub from:       String,
  pub to:         String,
  /// Already-encrypted body.
  pub content:    String,
  /// Creation instant; the store assigns "now" when absent.
  pub created_at: Option<DateTime<Utc>>,
}

impl NewMessage {
  pub fn new(
    from: impl Into<String>,
    to: impl Into<String>,
    content: impl Into<String>,
  ) -> Self {
    Self {
      from:       from.into(),
      to:         to.into(),
      content:    content.into(),
      created_at: None,
    }
  }

  pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
    self.created_at = Some(created_at);
    self
  }
}
