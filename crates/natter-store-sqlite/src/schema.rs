//! SQL schema for the Natter SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    username             TEXT PRIMARY KEY,
    name                 TEXT NOT NULL,
    email                TEXT NOT NULL UNIQUE,
    password_hash        TEXT NOT NULL,   -- argon2 PHC string
    contacts             TEXT NOT NULL DEFAULT '[]',  -- JSON array of usernames
    is_profile_image_set INTEGER NOT NULL DEFAULT 0,
    profile_image        TEXT,            -- base64
    created_at           TEXT NOT NULL    -- RFC 3339 UTC, fixed width
);

-- Messages are append-only.
CREATE TABLE IF NOT EXISTS messages (
    message_id TEXT PRIMARY KEY,
    from_user  TEXT NOT NULL,
    to_user    TEXT NOT NULL,
    content    TEXT NOT NULL,   -- ciphertext
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    version    INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS messages_pair_idx
    ON messages(from_user, to_user, created_at);

PRAGMA user_version = 1;
";
