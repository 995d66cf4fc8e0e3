//! Symmetric encryption of message bodies.
//!
//! [`AesCipher`] uses AES-256-GCM with a key derived from the configured
//! secret via SHA-256. The at-rest form is lowercase hex of
//! `nonce (12 bytes) || ciphertext || tag (16 bytes)`.

use aes_gcm::{
  Aes256Gcm, Key, Nonce,
  aead::{Aead, KeyInit},
};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum CipherError {
  #[error("encryption failed: {0}")]
  Encryption(String),

  #[error("decryption failed: {0}")]
  Decryption(String),
}

/// Encrypts and decrypts message bodies.
pub trait MessageCipher: Send + Sync {
  fn encrypt(&self, plaintext: &str) -> Result<String, CipherError>;

  /// Fails with [`CipherError::Decryption`] on malformed or tampered input.
  fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError>;
}

/// AES-256-GCM cipher keyed from a shared secret.
#[derive(Clone)]
pub struct AesCipher {
  cipher: Aes256Gcm,
}

impl AesCipher {
  pub fn new(secret: &str) -> Self {
    let digest = Sha256::digest(secret.as_bytes());
    let key = Key::<Aes256Gcm>::from_slice(&digest);
    Self { cipher: Aes256Gcm::new(key) }
  }
}

impl std::fmt::Debug for AesCipher {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("AesCipher(..)")
  }
}

impl MessageCipher for AesCipher {
  fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let sealed = self
      .cipher
      .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
      .map_err(|e| CipherError::Encryption(e.to_string()))?;

    let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&sealed);
    Ok(hex::encode(out))
  }

  fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError> {
    let raw = hex::decode(ciphertext)
      .map_err(|e| CipherError::Decryption(format!("not hex: {e}")))?;
    if raw.len() < NONCE_LEN + TAG_LEN {
      return Err(CipherError::Decryption("data too short".into()));
    }

    let (nonce, sealed) = raw.split_at(NONCE_LEN);
    let plain = self
      .cipher
      .decrypt(Nonce::from_slice(nonce), sealed)
      .map_err(|e| CipherError::Decryption(e.to_string()))?;

    String::from_utf8(plain)
      .map_err(|e| CipherError::Decryption(format!("invalid utf-8: {e}")))
  }
}
