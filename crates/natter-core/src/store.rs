//! The `UserStore` and `MessageStore` traits.
//!
//! The traits are implemented by storage backends (e.g. `natter-store-sqlite`).
//! Higher layers (`natter-api`, the contact feed) depend on these
//! abstractions, not on any concrete backend.

use std::future::Future;

use crate::{
  message::{Message, NewMessage},
  user::{ContactCard, NewUser, ProfileUpdate, User},
};

// ─── Users ───────────────────────────────────────────────────────────────────

/// Persisted users and their contact lists.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a user by username. Returns `None` if not found.
  fn find_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Retrieve a user by email address. Returns `None` if not found.
  fn find_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Resolve a list of usernames to their display-safe cards.
  ///
  /// The result follows the order of `usernames`. Unknown usernames are
  /// skipped, and a username listed twice is only returned once.
  fn find_many_by_username<'a>(
    &'a self,
    usernames: &'a [String],
  ) -> impl Future<Output = Result<Vec<ContactCard>, Self::Error>> + Send + 'a;

  /// Persist a new user with an empty contact list and no profile image.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Append `contact` to the contact list of `username`.
  ///
  /// Does not check for duplicates. Returns the updated user, or `None` if
  /// `username` does not exist.
  fn add_contact<'a>(
    &'a self,
    username: &'a str,
    contact: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Overwrite the display fields present in `update`. Returns the updated
  /// user, or `None` if `username` does not exist.
  fn update_profile<'a>(
    &'a self,
    username: &'a str,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Store a base64-encoded profile image and mark it as set. Returns the
  /// updated user, or `None` if `username` does not exist.
  fn set_profile_image<'a>(
    &'a self,
    username: &'a str,
    image_base64: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Cards of every user whose username starts with `prefix`, ordered by
  /// username. The match is literal and case-sensitive.
  fn search_by_prefix<'a>(
    &'a self,
    prefix: &'a str,
  ) -> impl Future<Output = Result<Vec<ContactCard>, Self::Error>> + Send + 'a;
}

// ─── Messages ────────────────────────────────────────────────────────────────

/// Persisted messages. Append-only.
pub trait MessageStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The most recently created message exchanged between `a` and `b` in
  /// either direction. Messages sharing a creation instant resolve to the one
  /// recorded last.
  fn find_latest_between<'a>(
    &'a self,
    a: &'a str,
    b: &'a str,
  ) -> impl Future<Output = Result<Option<Message>, Self::Error>> + Send + 'a;

  /// Record a message whose content is already encrypted.
  fn record_message(
    &self,
    input: NewMessage,
  ) -> impl Future<Output = Result<Message, Self::Error>> + Send + '_;
}

/// A backend providing both users and messages.
pub trait ChatStore: UserStore + MessageStore {}

impl<T: UserStore + MessageStore> ChatStore for T {}
