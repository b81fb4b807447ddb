//! Shared secret handling and derivation of the 32-byte AES-256 key.
//!
//! The derivation is a length normalisation, not a KDF: the secret's UTF-8
//! bytes are right-padded with zeroes or truncated to [`KEY_LEN`]. Existing
//! peers derive the key the same way, so it cannot be strengthened without
//! breaking the wire format.

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// The static passphrase configured identically on both ends.
///
/// Deserialises from a plain string so it can sit directly in a config
/// struct. Never printed, not even in debug builds.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SharedSecret(String);

impl SharedSecret {
    /// Wrap a passphrase.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Derive the AES-256 key from this secret.
    pub fn derive(&self) -> DerivedKey {
        derive(self.0.as_bytes())
    }

    /// `true` when the secret supplies at least [`KEY_LEN`] bytes, i.e. the
    /// derived key contains no zero padding.
    pub fn is_full_length(&self) -> bool {
        self.0.len() >= KEY_LEN
    }

    /// `true` for an empty or whitespace-only secret.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for SharedSecret {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SharedSecret {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

/// Fixed-size AES-256 key. Zeroed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Normalise `secret` to exactly [`KEY_LEN`] bytes.
///
/// Shorter input is right-padded with `0x00`; longer input is truncated.
/// Total over every input, including the empty slice.
pub fn derive(secret: &[u8]) -> DerivedKey {
    let mut key = [0u8; KEY_LEN];
    let n = secret.len().min(KEY_LEN);
    key[..n].copy_from_slice(&secret[..n]);
    DerivedKey(key)
}
