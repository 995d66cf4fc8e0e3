//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, TimeZone, Utc};
use natter_core::{
  message::NewMessage,
  store::{MessageStore, UserStore},
  user::{NewUser, ProfileUpdate},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(username: &str) -> NewUser {
  NewUser {
    username:      username.into(),
    name:          format!("{username} name"),
    email:         format!("{username}@example.com"),
    password_hash: "$argon2id$v=19$dummy".into(),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find_user() {
  let s = store().await;
  let created = s.create_user(new_user("alice")).await.unwrap();
  assert!(created.contacts.is_empty());
  assert!(!created.is_profile_image_set);

  let by_name = s.find_by_username("alice").await.unwrap().unwrap();
  assert_eq!(by_name, created);

  let by_email = s.find_by_email("alice@example.com").await.unwrap().unwrap();
  assert_eq!(by_email.username, "alice");
}

#[tokio::test]
async fn missing_user_returns_none() {
  let s = store().await;
  assert!(s.find_by_username("ghost").await.unwrap().is_none());
  assert!(s.find_by_email("ghost@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  s.create_user(new_user("alice")).await.unwrap();
  let mut dup = new_user("alice");
  dup.email = "other@example.com".into();
  assert!(s.create_user(dup).await.is_err());
}

#[tokio::test]
async fn add_contact_appends_in_order() {
  let s = store().await;
  s.create_user(new_user("alice")).await.unwrap();

  s.add_contact("alice", "carol").await.unwrap();
  let user = s.add_contact("alice", "bob").await.unwrap().unwrap();
  assert_eq!(user.contacts, ["carol", "bob"]);
}

#[tokio::test]
async fn add_contact_to_missing_user_returns_none() {
  let s = store().await;
  assert!(s.add_contact("ghost", "bob").await.unwrap().is_none());
}

#[tokio::test]
async fn find_many_follows_input_order() {
  let s = store().await;
  for u in ["alice", "bob", "carol"] {
    s.create_user(new_user(u)).await.unwrap();
  }

  let wanted: Vec<String> = ["carol", "ghost", "alice", "carol"]
    .into_iter()
    .map(String::from)
    .collect();
  let cards = s.find_many_by_username(&wanted).await.unwrap();
  let names: Vec<&str> = cards.iter().map(|c| c.username.as_str()).collect();
  assert_eq!(names, ["carol", "alice"]);
  assert_eq!(cards[0].name, "carol name");
}

#[tokio::test]
async fn update_profile_changes_only_given_fields() {
  let s = store().await;
  s.create_user(new_user("alice")).await.unwrap();

  let updated = s
    .update_profile("alice", ProfileUpdate { name: Some("Alice L.".into()), email: None })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.name, "Alice L.");
  assert_eq!(updated.email, "alice@example.com");

  let missing = s.update_profile("ghost", ProfileUpdate::default()).await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn set_profile_image_marks_flag() {
  let s = store().await;
  s.create_user(new_user("alice")).await.unwrap();

  let user = s
    .set_profile_image("alice", "iVBORw0KGgo=".into())
    .await
    .unwrap()
    .unwrap();
  assert!(user.is_profile_image_set);
  assert_eq!(user.profile_image.as_deref(), Some("iVBORw0KGgo="));
}

#[tokio::test]
async fn search_by_prefix_is_literal_and_case_sensitive() {
  let s = store().await;
  for u in ["alice", "alfred", "Albert", "bob", "a%b"] {
    s.create_user(new_user(u)).await.unwrap();
  }

  let found = s.search_by_prefix("al").await.unwrap();
  let names: Vec<&str> = found.iter().map(|c| c.username.as_str()).collect();
  assert_eq!(names, ["alfred", "alice"]);

  let found = s.search_by_prefix("a%").await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].username, "a%b");
}

// ─── Messages ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_between_matches_both_directions() {
  let s = store().await;
  let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

  s.record_message(NewMessage::new("alice", "bob", "c1").at(t0)).await.unwrap();
  s.record_message(NewMessage::new("bob", "alice", "c2").at(t0 + Duration::minutes(5)))
    .await
    .unwrap();
  s.record_message(NewMessage::new("alice", "carol", "c3").at(t0 + Duration::hours(1)))
    .await
    .unwrap();

  let latest = s.find_latest_between("alice", "bob").await.unwrap().unwrap();
  assert_eq!(latest.content, "c2");
  assert_eq!(latest.from, "bob");
  assert_eq!(latest.created_at, t0 + Duration::minutes(5));

  let reversed = s.find_latest_between("bob", "alice").await.unwrap().unwrap();
  assert_eq!(reversed.message_id, latest.message_id);
}

#[tokio::test]
async fn latest_between_prefers_last_recorded_on_tie() {
  let s = store().await;
  let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
  s.record_message(NewMessage::new("alice", "bob", "first").at(t0)).await.unwrap();
  s.record_message(NewMessage::new("bob", "alice", "second").at(t0)).await.unwrap();

  let latest = s.find_latest_between("alice", "bob").await.unwrap().unwrap();
  assert_eq!(latest.content, "second");
}

#[tokio::test]
async fn latest_between_without_messages_is_none() {
  let s = store().await;
  s.record_message(NewMessage::new("alice", "carol", "x")).await.unwrap();
  assert!(s.find_latest_between("alice", "bob").await.unwrap().is_none());
}

#[tokio::test]
async fn recorded_message_round_trips_timestamps() {
  let s = store().await;
  let recorded = s.record_message(NewMessage::new("alice", "bob", "x")).await.unwrap();
  let fetched = s.find_latest_between("alice", "bob").await.unwrap().unwrap();
  assert_eq!(fetched, recorded);
}
