//! Failure taxonomy for sealing and opening envelopes.

use thiserror::Error;

/// Errors produced by the envelope layer.
///
/// None of the variants carry plaintext, key bytes, or envelope contents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The envelope string is structurally invalid: missing or extra
    /// delimiter, bad base64, wrong IV length, or a ciphertext that cannot
    /// be a whole number of blocks.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(&'static str),

    /// Decryption produced a trailer that is not valid PKCS#7 padding.
    /// Almost always a wrong key, corrupted transport, or a peer on a
    /// different wire version.
    #[error("invalid padding after decryption")]
    Padding,

    /// The cipher primitive rejected its key or IV. Key and IV sizes are
    /// fixed, so this indicates a defect rather than bad input.
    #[error("cipher invariant violated: {0}")]
    Cipher(&'static str),

    /// Bytes could not be represented or decoded as UTF-8.
    #[error("payload is not valid UTF-8")]
    Encoding,
}

impl EnvelopeError {
    /// Stable machine-readable code for this failure.
    pub fn kind(&self) -> &'static str {
        match self {
            EnvelopeError::MalformedEnvelope(_) => "malformed_envelope",
            EnvelopeError::Padding => "padding",
            EnvelopeError::Cipher(_) => "cipher",
            EnvelopeError::Encoding => "encoding",
        }
    }

    /// `true` when the failure typically means the two ends disagree on the
    /// shared secret, as opposed to a garbled envelope string.
    pub fn is_key_mismatch_suspected(&self) -> bool {
        matches!(self, EnvelopeError::Padding)
    }
}
