//! Request middleware: transparent unwrapping of `{"encrypted": ...}` bodies.
//!
//! For paths under a configured prefix, a JSON body carrying a truthy
//! `encrypted` field (anything but `null`, `false`, `0` or `""`) is opened and replaced with the decrypted document before it reaches
//! the handler. Bodies that also carry plain fields are treated as plain when
//! the envelope is unusable; envelope-only bodies are rejected with 400.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use bytes::Bytes;
use http_body_util::LengthLimitError;
use common::{protocol::ENCRYPTED_FIELD, ServiceError};
use envelope::Sealer;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use super::handlers::{decryption_failure, error_response};
use super::state::AppState;

/// Marker added to bodies that arrived sealed.
pub const WAS_ENCRYPTED_FIELD: &str = "_wasEncrypted";

/// What to do with a buffered request body.
#[derive(Debug)]
pub(crate) enum BodyOutcome {
    /// Forward the original bytes unchanged.
    Passthrough,
    /// Forward this JSON document instead.
    Replace(Value),
    /// Stop and answer with this error.
    Reject(ServiceError),
}

/// Axum middleware applying [`unwrap_body`] to requests on encrypted paths.
pub async fn decrypt_body(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if !state.is_encrypted_path(req.uri().path()) {
        return next.run(req).await;
    }

    let (mut parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(b) => b,
        Err(e) => {
            warn!(error = %e, "failed to buffer request body");
            let err = if e.into_inner().is::<LengthLimitError>() {
                ServiceError::PayloadTooLarge(state.max_body_bytes)
            } else {
                ServiceError::BadRequest("request body could not be read".into())
            };
            return error_response(&err);
        }
    };

    let body = match unwrap_body(&state.sealer, &bytes) {
        BodyOutcome::Passthrough => bytes,
        BodyOutcome::Replace(value) => {
            let replaced = Bytes::from(value.to_string());
            parts
                .headers
                .insert(header::CONTENT_LENGTH, HeaderValue::from(replaced.len()));
            replaced
        }
        BodyOutcome::Reject(err) => return error_response(&err),
    };

    next.run(Request::from_parts(parts, Body::from(body))).await
}

/// Decide how to forward `bytes`.
pub(crate) fn unwrap_body(sealer: &Sealer, bytes: &[u8]) -> BodyOutcome {
    let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(bytes) else {
        return BodyOutcome::Passthrough;
    };
    let Some(encrypted) = fields.get(ENCRYPTED_FIELD).filter(|v| is_truthy(v)) else {
        return BodyOutcome::Passthrough;
    };
    let has_other_fields = fields.len() > 1;

    let envelope = match encrypted.as_str() {
        Some(s) if s.contains(':') => s.to_owned(),
        _ => {
            warn!(has_other_fields, "invalid encrypted data format");
            if !has_other_fields {
                return BodyOutcome::Reject(ServiceError::BadRequest(
                    "invalid encrypted data format".into(),
                ));
            }
            return strip_encrypted(fields);
        }
    };

    match open_document(sealer, &envelope) {
        Ok(mut value) => {
            if let Value::Object(obj) = &mut value {
                obj.insert(WAS_ENCRYPTED_FIELD.into(), Value::Bool(true));
            }
            debug!(envelope_len = envelope.len(), "request body decrypted");
            BodyOutcome::Replace(value)
        }
        Err(err) if !has_other_fields => {
            error!(
                error = %err,
                envelope_len = envelope.len(),
                "decryption failed for encrypted-only request"
            );
            BodyOutcome::Reject(err)
        }
        Err(err) => {
            warn!(error = %err, "decryption failed but other fields present, treating as unencrypted");
            strip_encrypted(fields)
        }
    }
}

/// Open an envelope whose plaintext must be a JSON document.
pub(crate) fn open_document(sealer: &Sealer, envelope: &str) -> Result<Value, ServiceError> {
    let plaintext = sealer.open(envelope).map_err(|e| decryption_failure(&e))?;
    serde_json::from_str(&plaintext)
        .map_err(|_| ServiceError::BadRequest("decrypted payload is not valid JSON".into()))
}

/// Peers treat a falsy `encrypted` value as "not sealed".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Bool(true) | Value::Array(_) | Value::Object(_) => true,
    }
}

fn strip_encrypted(mut fields: Map<String, Value>) -> BodyOutcome {
    fields.remove(ENCRYPTED_FIELD);
    BodyOutcome::Replace(Value::Object(fields))
}
