//! Request and response bodies exchanged between the apps and the gateway.
//!
//! All types are serialised as JSON. The envelope string itself is opaque at
//! this layer; see the `envelope` crate for its structure.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Encrypted body
// ---------------------------------------------------------------------------

/// Name of the JSON field carrying an envelope string.
pub const ENCRYPTED_FIELD: &str = "encrypted";

/// A request or response body whose only content is a sealed envelope.
///
/// Serialises as `{"encrypted": "<base64 iv>:<base64 iv || ciphertext>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBody {
    /// The envelope string produced by sealing a JSON document.
    pub encrypted: String,
}

impl EncryptedBody {
    /// Wrap an envelope string.
    pub fn new(encrypted: impl Into<String>) -> Self {
        Self {
            encrypted: encrypted.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"decryption_failed"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
    /// Narrower cause, when one can be given without leaking payload data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Operator-facing remediation hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    /// Attach a `details` string.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach a `hint` string.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status, always `"ok"` once the process is serving.
    pub status: String,
    /// Crate version of the running gateway.
    pub version: String,
}
