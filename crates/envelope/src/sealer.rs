//! `seal` and `open`: the two envelope operations.

use tracing::debug;

use crate::cipher::{self, IV_LEN};
use crate::error::EnvelopeError;
use crate::key::{DerivedKey, SharedSecret};
use crate::wire::Envelope;

/// Seals and opens envelopes under one derived key.
///
/// Holds no mutable state: clone it freely or share it behind an `Arc`
/// across threads. Every call draws its own IV and builds its own cipher.
#[derive(Clone, Debug)]
pub struct Sealer {
    key: DerivedKey,
}

impl Sealer {
    /// Build a sealer from the shared secret.
    pub fn new(secret: &SharedSecret) -> Self {
        Self::from_key(secret.derive())
    }

    /// Build a sealer from an already-derived key.
    pub fn from_key(key: DerivedKey) -> Self {
        Self { key }
    }

    /// Encrypt `plaintext` under a fresh random IV and return the envelope string.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Cipher`] only on a primitive-usage defect.
    pub fn seal(&self, plaintext: &str) -> Result<String, EnvelopeError> {
        self.seal_with_iv(plaintext, cipher::generate_iv())
    }

    /// Like [`Sealer::seal`] but for raw bytes, which must be UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Encoding`] if `plaintext` is not UTF-8.
    pub fn seal_bytes(&self, plaintext: &[u8]) -> Result<String, EnvelopeError> {
        let text = std::str::from_utf8(plaintext).map_err(|_| EnvelopeError::Encoding)?;
        self.seal(text)
    }

    /// Encrypt under a caller-chosen IV.
    ///
    /// Deterministic; intended for pinning known-answer vectors. Reusing an IV
    /// with the same key leaks equality of plaintext prefixes, so production
    /// code must use [`Sealer::seal`].
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Cipher`] only on a primitive-usage defect.
    pub fn seal_with_iv(
        &self,
        plaintext: &str,
        iv: [u8; IV_LEN],
    ) -> Result<String, EnvelopeError> {
        let ciphertext = cipher::encrypt(&self.key, &iv, plaintext.as_bytes())?;
        let wire = Envelope::new(iv, &ciphertext).to_wire();
        debug!(
            plaintext_len = plaintext.len(),
            envelope_len = wire.len(),
            "sealed payload"
        );
        Ok(wire)
    }

    /// Decrypt an envelope string back to its UTF-8 plaintext.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::MalformedEnvelope`] for a structurally invalid envelope.
    /// - [`EnvelopeError::Padding`] when the padding check fails (wrong key or corruption).
    /// - [`EnvelopeError::Encoding`] when the plaintext is not UTF-8.
    pub fn open(&self, envelope: &str) -> Result<String, EnvelopeError> {
        let bytes = self.open_bytes(envelope)?;
        String::from_utf8(bytes).map_err(|_| {
            debug!(kind = "encoding", "failed to open envelope");
            EnvelopeError::Encoding
        })
    }

    /// Decrypt an envelope string, returning the raw plaintext bytes.
    ///
    /// # Errors
    ///
    /// As [`Sealer::open`], minus the UTF-8 check.
    pub fn open_bytes(&self, envelope: &str) -> Result<Vec<u8>, EnvelopeError> {
        let result = Envelope::parse(envelope)
            .and_then(|env| cipher::decrypt(&self.key, env.iv(), env.ciphertext()));
        if let Err(e) = &result {
            debug!(kind = e.kind(), envelope_len = envelope.len(), "failed to open envelope");
        }
        result
    }
}

/// Seal `plaintext` with a key derived from `secret`.
///
/// # Errors
///
/// See [`Sealer::seal`].
pub fn seal(secret: &SharedSecret, plaintext: &str) -> Result<String, EnvelopeError> {
    Sealer::new(secret).seal(plaintext)
}

/// Open `envelope` with a key derived from `secret`.
///
/// # Errors
///
/// See [`Sealer::open`].
pub fn open(secret: &SharedSecret, envelope: &str) -> Result<String, EnvelopeError> {
    Sealer::new(secret).open(envelope)
}
