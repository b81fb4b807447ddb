//! Axum request handlers for all service endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{EncryptedBody, ErrorResponse, HealthResponse};
use common::ServiceError;
use envelope::EnvelopeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::middleware::{open_document, WAS_ENCRYPTED_FIELD};
use super::state::AppState;

/// Remediation hint attached to every decryption failure.
pub const SHARED_SECRET_HINT: &str =
    "ensure the ENCRYPTION_KEY shared secret matches between the client and the server";

/// Acknowledgement returned by the auth intake routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAck {
    /// Which intake route handled the request.
    pub action: String,
    /// Top-level field names of the (decrypted) body, sorted.
    pub received_fields: Vec<String>,
    /// Whether the body arrived as an envelope.
    pub was_encrypted: bool,
}

/// `POST /seal` — seal an arbitrary JSON document into `{"encrypted": ...}`.
pub async fn seal(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    match state.sealer.seal(&payload.to_string()) {
        Ok(envelope) => (StatusCode::OK, Json(EncryptedBody::new(envelope))).into_response(),
        Err(e) => {
            warn!(kind = e.kind(), "sealing failed");
            error_response(&ServiceError::EncryptionFailure(e.kind().into()))
        }
    }
}

/// `POST /open` — open `{"encrypted": ...}` and return the JSON document inside.
pub async fn open(State(state): State<AppState>, Json(body): Json<EncryptedBody>) -> Response {
    match open_document(&state.sealer, &body.encrypted) {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => {
            warn!(error = %e, "open failed");
            error_response(&e)
        }
    }
}

/// `POST /api/auth/register` — intake point for sealed registration bodies.
pub async fn register(Json(body): Json<Value>) -> Response {
    acknowledge("register", body)
}

/// `POST /api/auth/login` — intake point for sealed login bodies.
pub async fn login(Json(body): Json<Value>) -> Response {
    acknowledge("login", body)
}

/// `GET /health` — liveness check.
pub async fn health() -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn acknowledge(action: &str, body: Value) -> Response {
    let Value::Object(fields) = body else {
        return error_response(&ServiceError::BadRequest(
            "request body must be a JSON object".into(),
        ));
    };
    let was_encrypted = fields
        .get(WAS_ENCRYPTED_FIELD)
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let mut received_fields: Vec<String> = fields
        .keys()
        .filter(|k| k.as_str() != WAS_ENCRYPTED_FIELD)
        .cloned()
        .collect();
    received_fields.sort();

    info!(action, was_encrypted, fields = received_fields.len(), "auth request received");
    let ack = AuthAck {
        action: action.into(),
        received_fields,
        was_encrypted,
    };
    (StatusCode::OK, Json(ack)).into_response()
}

/// Classify an envelope failure for the caller.
///
/// Padding failures point at a secret mismatch; everything else at a garbled
/// envelope. Either way the client should not retry.
pub(crate) fn decryption_failure(e: &EnvelopeError) -> ServiceError {
    let details = if e.is_key_mismatch_suspected() {
        "key mismatch or corrupted data"
    } else if matches!(e, EnvelopeError::Encoding) {
        "decrypted payload is not valid UTF-8"
    } else {
        "invalid encrypted data format"
    };
    ServiceError::DecryptionFailed(details.into())
}

/// Render a [`ServiceError`] as a JSON [`ErrorResponse`].
pub(crate) fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = match err {
        ServiceError::BadRequest(msg) => ErrorResponse::new(err.code(), msg.clone()),
        ServiceError::PayloadTooLarge(_) => ErrorResponse::new(err.code(), err.to_string()),
        ServiceError::DecryptionFailed(details) => {
            ErrorResponse::new(err.code(), "failed to decrypt request data")
                .with_details(details.clone())
                .with_hint(SHARED_SECRET_HINT)
        }
        // Cipher detail stays in the logs.
        ServiceError::EncryptionFailure(_) => ErrorResponse::new(err.code(), "encryption failed"),
    };
    (status, Json(body)).into_response()
}
