//! Registration rules and password hashing.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;
use thiserror::Error;

use crate::{Error, Result};

/// Passwords must be longer than this many characters.
pub const MIN_PASSWORD_EXCLUSIVE: usize = 5;

/// Account failures that are reported back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
  #[error("Username is required!")]
  MissingUsername,

  #[error("Invalid email!")]
  InvalidEmail,

  #[error("Password should be greater than 5 characters")]
  PasswordTooShort,

  #[error("User with this email already exists!")]
  EmailTaken,

  #[error("User with this username already exists!")]
  UsernameTaken,

  #[error("No user found with these credentials!")]
  InvalidCredentials,
}

/// Accepts `local@domain.tld` shaped addresses without whitespace.
pub fn validate_email(email: &str) -> Result<(), AccountError> {
  let valid = match email.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| {
          !label.is_empty()
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
    }
    None => false,
  };
  if valid { Ok(()) } else { Err(AccountError::InvalidEmail) }
}

pub fn validate_password(password: &str) -> Result<(), AccountError> {
  if password.chars().count() <= MIN_PASSWORD_EXCLUSIVE {
    return Err(AccountError::PasswordTooShort);
  }
  Ok(())
}

/// Check the fields of a registration request, in the order clients expect
/// the errors to be reported.
pub fn validate_registration(
  username: &str,
  email: &str,
  password: &str,
) -> Result<(), AccountError> {
  if username.trim().is_empty() {
    return Err(AccountError::MissingUsername);
  }
  validate_email(email)?;
  validate_password(password)
}

/// Hash `password` into an argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// `true` if `password` matches the PHC string `hash`. A malformed hash never
/// matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn emails() {
    assert!(validate_email("alice@example.com").is_ok());
    assert!(validate_email("a.b+tag@mail.example.co.uk").is_ok());
    assert_eq!(validate_email("alice"), Err(AccountError::InvalidEmail));
    assert_eq!(validate_email("@example.com"), Err(AccountError::InvalidEmail));
    assert_eq!(validate_email("alice@localhost"), Err(AccountError::InvalidEmail));
    assert_eq!(validate_email("alice@exa mple.com"), Err(AccountError::InvalidEmail));
    assert_eq!(validate_email("alice@@example.com"), Err(AccountError::InvalidEmail));
    assert_eq!(validate_email("alice@example..com"), Err(AccountError::InvalidEmail));
  }

  #[test]
  fn password_length_boundary() {
    assert_eq!(validate_password("12345"), Err(AccountError::PasswordTooShort));
    assert!(validate_password("123456").is_ok());
  }

  #[test]
  fn registration_reports_email_before_password() {
    assert_eq!(
      validate_registration("alice", "nope", "1"),
      Err(AccountError::InvalidEmail)
    );
    assert_eq!(
      validate_registration("", "alice@example.com", "secret123"),
      Err(AccountError::MissingUsername)
    );
  }

  #[test]
  fn hash_and_verify() {
    let hash = hash_password("hunter22").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("hunter22", &hash));
    assert!(!verify_password("hunter23", &hash));
    assert!(!verify_password("hunter22", "not a phc string"));
  }
}
