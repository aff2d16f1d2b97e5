//! # Response Envelope & Status Classification
//!
//! Every response this service writes is the uniform `{data, error}`
//! envelope: success sets `data` and leaves `error` empty, failure nulls
//! `data` and carries a message. The single exception is the session-create
//! conflict, where the 409 body carries the existing cart *and* the error
//! text so the caller gets the original cart back.
//!
//! Status classification happens here, once, for every collaborator error.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use kaimono_core::{Cart, CartError, CartResult};

// =============================================================================
// Envelopes
// =============================================================================

/// The uniform response wrapper.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub data: Option<T>,
    pub error: String,
}

/// Request bodies arrive in the same shape: `{"data": <payload>}`.
#[derive(Debug, Deserialize)]
pub struct RequestEnvelope<T> {
    pub data: T,
}

/// Decodes a cart update payload from a raw request body.
///
/// Fails with `CartError::Decode` carrying the serde message, so the caller
/// can short-circuit with 400 before touching the store.
pub(crate) fn decode_cart(body: &[u8]) -> CartResult<Cart> {
    let envelope: RequestEnvelope<Cart> =
        serde_json::from_slice(body).map_err(|err| CartError::Decode(err.to_string()))?;
    Ok(envelope.data)
}

// =============================================================================
// Status Classification
// =============================================================================

/// Maps an error kind to its status code.
///
/// `NotAuthorized` and `CartNotFound` map to distinct codes and must stay
/// that way: collapsing 403 into 404 (or back) would leak resource existence
/// to unauthorized callers.
pub fn status_for(err: &CartError) -> StatusCode {
    match err {
        CartError::SessionNotFound => StatusCode::BAD_REQUEST,
        CartError::Decode(_) => StatusCode::BAD_REQUEST,
        CartError::CartNotFound => StatusCode::NOT_FOUND,
        CartError::AlreadyExists => StatusCode::CONFLICT,
        CartError::InvalidId => StatusCode::FORBIDDEN,
        CartError::NotAuthorized { .. } => StatusCode::FORBIDDEN,
        CartError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// Response Writers
// =============================================================================

/// Writes a success envelope with the given status.
pub(crate) fn success<T: Serialize>(code: StatusCode, data: T) -> Response {
    write_json(
        code,
        &Envelope {
            data: Some(data),
            error: String::new(),
        },
    )
}

/// Classifies the error, logs it, and writes a failure envelope.
pub(crate) fn failure(err: &CartError) -> Response {
    let code = status_for(err);

    if let CartError::NotAuthorized {
        operation,
        resource_id,
    } = err
    {
        warn!(%operation, %resource_id, "authorization denied");
    } else if err.is_client_error() {
        debug!(error = %err, status = %code, "request rejected");
    } else {
        error!(error = %err, "request failed");
    }

    write_json(
        code,
        &Envelope::<Cart> {
            data: None,
            error: err.to_string(),
        },
    )
}

/// Writes the 409 for a session create that found an existing cart.
///
/// The existing cart rides along in `data` so a second create still returns
/// the original cart to the caller.
pub(crate) fn conflict_with_existing(existing: Cart) -> Response {
    debug!(cart_id = %existing.id, "create conflict, returning existing cart");
    write_json(
        StatusCode::CONFLICT,
        &Envelope {
            data: Some(existing),
            error: CartError::AlreadyExists.to_string(),
        },
    )
}

fn write_json<T: Serialize>(code: StatusCode, payload: &T) -> Response {
    match serde_json::to_vec(payload) {
        Ok(body) => (
            code,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(err) => {
            // Serialization of our own envelope should never fail; if it
            // does, log it and degrade to a bare 500.
            error!(error = %err, "could not encode response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
