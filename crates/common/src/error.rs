//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::DecryptionFailed`] → 400
/// - [`ServiceError::PayloadTooLarge`] → 413
/// - [`ServiceError::EncryptionFailure`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: invalid JSON or a missing field.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An envelope could not be opened. Points at a shared-secret or version
    /// mismatch between peers rather than a transient fault; do not retry.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// The request body exceeds the configured buffering limit.
    #[error("payload too large: limit is {0} bytes")]
    PayloadTooLarge(usize),

    /// Sealing a payload failed inside the cipher layer.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::DecryptionFailed(_) => 400,
            ServiceError::PayloadTooLarge(_) => 413,
            ServiceError::EncryptionFailure(_) => 500,
        }
    }

    /// Short machine-readable code used in [`crate::protocol::ErrorResponse`].
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::DecryptionFailed(_) => "decryption_failed",
            ServiceError::PayloadTooLarge(_) => "payload_too_large",
            ServiceError::EncryptionFailure(_) => "encryption_failed",
        }
    }
}
