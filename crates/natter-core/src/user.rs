//! Users and the display-safe projections handed out over the wire.
//!
//! [`User`] is the stored record and is intentionally not `Serialize`: the
//! password hash must never reach a response body. Every outward shape is its
//! own view type containing only the fields it exposes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user as persisted by a [`UserStore`](crate::store::UserStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub username:             String,
  pub name:                 String,
  pub email:                String,
  /// argon2 PHC string, e.g. `$argon2id$v=19$…`
  pub password_hash:        String,
  /// Usernames in the order they were added.
  pub contacts:             Vec<String>,
  pub is_profile_image_set: bool,
  /// Base64-encoded image bytes.
  pub profile_image:        Option<String>,
  pub created_at:           DateTime<Utc>,
}

impl User {
  pub fn has_contact(&self, username: &str) -> bool {
    self.contacts.iter().any(|c| c == username)
  }

  pub fn card(&self) -> ContactCard {
    ContactCard {
      name:                 self.name.clone(),
      username:             self.username.clone(),
      is_profile_image_set: self.is_profile_image_set,
      profile_image:        self.profile_image.clone(),
    }
  }

  pub fn profile(&self) -> Profile {
    Profile {
      name:                 self.name.clone(),
      email:                self.email.clone(),
      username:             self.username.clone(),
      is_profile_image_set: self.is_profile_image_set,
      profile_image:        self.profile_image.clone(),
      total_chats:          self.contacts.len(),
    }
  }
}

/// Input to [`UserStore::create_user`](crate::store::UserStore::create_user).
/// The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
}

/// Partial update of the display fields of a user. `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
  pub name:  Option<String>,
  pub email: Option<String>,
}

// ─── Views ────────────────────────────────────────────────────────────────────

/// A user as returned by `/register`, `/login` and `POST /profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
  pub name:                 String,
  pub username:             String,
  pub email:                String,
  pub contacts:             Vec<String>,
  pub is_profile_image_set: bool,
  pub profile_image:        Option<String>,
}

impl From<&User> for PublicUser {
  fn from(u: &User) -> Self {
    PublicUser {
      name:                 u.name.clone(),
      username:             u.username.clone(),
      email:                u.email.clone(),
      contacts:             u.contacts.clone(),
      is_profile_image_set: u.is_profile_image_set,
      profile_image:        u.profile_image.clone(),
    }
  }
}

/// The display-safe subset of a user shown in contact lists and search
/// results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCard {
  pub name:                 String,
  pub username:             String,
  pub is_profile_image_set: bool,
  pub profile_image:        Option<String>,
}

/// A user as returned by `GET /profile/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
  pub name:                 String,
  pub email:                String,
  pub username:             String,
  #[serde(rename = "isProfileImageSet")]
  pub is_profile_image_set: bool,
  #[serde(rename = "profileImage")]
  pub profile_image:        Option<String>,
  /// Number of entries in the user's contact list.
  pub total_chats:          usize,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn alice() -> User {
    User {
      username:             "alice".into(),
      name:                 "Alice Liddell".into(),
      email:                "alice@example.com".into(),
      password_hash:        "$argon2id$v=19$secret".into(),
      contacts:             vec!["bob".into(), "carol".into()],
      is_profile_image_set: false,
      profile_image:        None,
      created_at:           Utc::now(),
    }
  }

  #[test]
  fn public_user_omits_password_hash() {
    let json = serde_json::to_value(PublicUser::from(&alice())).unwrap();
    let obj = json.as_object().unwrap();
    assert!(!obj.contains_key("password"));
    assert!(!obj.contains_key("password_hash"));
    assert!(!obj.contains_key("passwordHash"));
    assert_eq!(obj["isProfileImageSet"], false);
    assert!(obj["profileImage"].is_null());
  }

  #[test]
  fn profile_counts_contacts() {
    let json = serde_json::to_value(alice().profile()).unwrap();
    assert_eq!(json["total_chats"], 2);
    assert_eq!(json["email"], "alice@example.com");
    assert!(json.get("contacts").is_none());
  }

  #[test]
  fn has_contact_matches_exactly() {
    let u = alice();
    assert!(u.has_contact("bob"));
    assert!(!u.has_contact("Bob"));
    assert!(!u.has_contact("dave"));
  }
}
