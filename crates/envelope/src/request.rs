//! Building sealed request bodies and opening sealed response bodies.
//!
//! The session token comes from an injected [`TokenProvider`] rather than
//! ambient storage, and the key from the [`Sealer`] handed in at construction.

use common::EncryptedBody;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::EnvelopeError;
use crate::sealer::Sealer;

/// Errors from sealing or opening JSON bodies.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The envelope layer failed.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// The body could not be serialised, or the opened plaintext is not the
    /// expected JSON shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Supplies the bearer token for authenticated requests.
#[cfg_attr(test, mockall::automock)]
pub trait TokenProvider: Send + Sync {
    /// The current session token, or `None` when signed out.
    fn bearer_token(&self) -> Option<String>;
}

/// Provider for unauthenticated calls such as login and registration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl TokenProvider for Anonymous {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// A request ready for the network layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedRequest {
    /// JSON body: `{"encrypted": "<envelope>"}`.
    pub body: EncryptedBody,
    /// Value for the `Authorization` header, if a token is available.
    pub authorization: Option<String>,
}

/// Seals outgoing JSON bodies and opens sealed responses.
#[derive(Debug, Clone)]
pub struct RequestSealer<P> {
    sealer: Sealer,
    tokens: P,
}

impl<P: TokenProvider> RequestSealer<P> {
    /// Combine a sealer with a token source.
    pub fn new(sealer: Sealer, tokens: P) -> Self {
        Self { sealer, tokens }
    }

    /// Serialise `body` to JSON, seal it, and attach the bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Json`] if `body` cannot be serialised and
    /// [`RequestError::Envelope`] if sealing fails.
    pub fn seal_json<T: Serialize + ?Sized>(
        &self,
        body: &T,
    ) -> Result<SealedRequest, RequestError> {
        let json = serde_json::to_string(body)?;
        let envelope = self.sealer.seal(&json)?;
        let authorization = self.tokens.bearer_token().map(|t| format!("Bearer {t}"));
        debug!(authenticated = authorization.is_some(), "sealed request body");
        Ok(SealedRequest {
            body: EncryptedBody::new(envelope),
            authorization,
        })
    }

    /// Open a sealed response body and deserialise its JSON plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Envelope`] if the envelope cannot be opened and
    /// [`RequestError::Json`] if the plaintext is not a valid `T`.
    pub fn open_json<T: DeserializeOwned>(
        &self,
        body: &EncryptedBody,
    ) -> Result<T, RequestError> {
        let plaintext = self.sealer.open(&body.encrypted)?;
        Ok(serde_json::from_str(&plaintext)?)
    }
}
