//! # Error Taxonomy
//!
//! Domain error types for kaimono-core.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Error Classification                             │
//! │                                                                         │
//! │  Store / Resolver / Authorizer ──► CartError ──► HTTP status           │
//! │                                                                         │
//! │  SessionNotFound ──► 400      CartNotFound ──► 404                     │
//! │  AlreadyExists   ──► 409      InvalidId    ──► 403                     │
//! │  NotAuthorized   ──► 403      Decode       ──► 400                     │
//! │  Internal        ──► 500                                                │
//! │                                                                         │
//! │  Each collaborator error is classified exactly once, at the handler    │
//! │  boundary. The status mapping itself lives in kaimono-service          │
//! │  (this crate stays HTTP-free).                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Errors are enum variants, never bare strings, so handlers can switch
//!    on the kind explicitly
//! 3. `NotAuthorized` and `CartNotFound` are distinct kinds and must never
//!    be conflated: "forbidden" leaking into "absent" (or back) would reveal
//!    resource existence to unauthorized callers

use thiserror::Error;

use crate::types::Operation;

// =============================================================================
// Cart Error
// =============================================================================

/// Every failure the cart service can surface to a caller.
///
/// Collaborators (store, resolver, authorizer) each signal a subset of these
/// kinds; see their trait contracts in `kaimono-service`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    /// No session could be derived for the request, or the named session is
    /// unknown to the store.
    #[error("session not found")]
    SessionNotFound,

    /// No cart exists for the requested ID or session.
    #[error("cart not found")]
    CartNotFound,

    /// A cart is already associated with this session.
    ///
    /// ## When This Occurs
    /// - Second create on the same session (at most one cart per session)
    /// - The losing side of two creates racing on one session
    #[error("cart already exists for session")]
    AlreadyExists,

    /// The payload's cart ID does not match the cart the caller owns.
    ///
    /// Raised before any store mutation: a session owner may only overwrite
    /// their own cart.
    #[error("cart ID does not match the session's cart")]
    InvalidId,

    /// The authorizer denied the operation.
    ///
    /// Carries the denied operation and resource ID for audit logging. Maps
    /// to 403 regardless of whether the resource exists.
    #[error("not authorized for op ({operation}) on resource ID '{resource_id}'")]
    NotAuthorized {
        operation: Operation,
        resource_id: String,
    },

    /// The request body could not be decoded.
    #[error("could not decode request: {0}")]
    Decode(String),

    /// Infrastructure failure in a collaborator. Catch-all; maps to 500.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CartError {
    /// True for failures caused by the caller's request rather than by the
    /// service or its collaborators.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CartError::Internal(_))
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperationType;

    #[test]
    fn test_not_authorized_message_carries_audit_fields() {
        let err = CartError::NotAuthorized {
            operation: Operation::cart(OperationType::Update),
            resource_id: "cart-42".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("update cart"));
        assert!(msg.contains("cart-42"));
    }

    #[test]
    fn test_decode_message_mentions_decode_failure() {
        let err = CartError::Decode("expected value at line 1 column 1".to_string());
        assert!(err.to_string().contains("could not decode"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(CartError::SessionNotFound.is_client_error());
        assert!(CartError::CartNotFound.is_client_error());
        assert!(CartError::AlreadyExists.is_client_error());
        assert!(!CartError::Internal("store offline".to_string()).is_client_error());
    }
}
