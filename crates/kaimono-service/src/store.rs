//! # Collaborator Traits
//!
//! The three seams the cart service is built against: storage, session
//! resolution, and authorization. Handlers only ever talk to these traits;
//! concrete backends are injected at construction.
//!
//! ## Contract Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Collaborator Contracts                             │
//! │                                                                         │
//! │  ┌───────────────────┐  ┌─────────────────────┐  ┌──────────────────┐  │
//! │  │    CartStore      │  │ UserContextResolver │  │    Authorizer    │  │
//! │  │                   │  │                     │  │                  │  │
//! │  │ lookup            │  │ user_context        │  │ authorize        │  │
//! │  │ lookup_for_session│  │                     │  │                  │  │
//! │  │ create_for_session│  │ Fails with:         │  │ Fails with:      │  │
//! │  │ create_unbound    │  │  SessionNotFound    │  │  NotAuthorized   │  │
//! │  │ replace           │  │  Internal           │  │  Internal        │  │
//! │  │ delete            │  │                     │  │                  │  │
//! │  └───────────────────┘  └─────────────────────┘  └──────────────────┘  │
//! │                                                                         │
//! │  All report failures in the shared CartError taxonomy; the handler     │
//! │  boundary classifies each error exactly once into a status code.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store owns all concurrency control for cart data. Nothing at this
//! layer locks; concurrent replaces of one cart must not interleave partial
//! writes, and creates racing on one session must resolve to a single winner.

use async_trait::async_trait;
use axum::http::HeaderMap;

use kaimono_core::{Cart, CartResult, Operation, UserContext};

// =============================================================================
// Cart Store
// =============================================================================

/// Outcome of a session-scoped create.
///
/// The already-exists signal travels together with the existing cart, so the
/// handler can both answer 409 and return the original cart to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCartOutcome {
    /// A fresh cart was created and bound to the session.
    Created(Cart),
    /// The session already had a cart; here it is.
    AlreadyExists(Cart),
}

/// Persists and retrieves cart aggregates by ID or by session.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Finds the cart matching the ID. Does not check permissions and must
    /// only be called after the user has been authorized.
    ///
    /// Fails with `CartNotFound` if no cart matches.
    async fn lookup(&self, cart_id: &str) -> CartResult<Cart>;

    /// Finds the cart bound to this session.
    ///
    /// Fails with `SessionNotFound` if the session is unknown, and with
    /// `CartNotFound` if the session exists but has no cart.
    async fn lookup_for_session(&self, session_token: &str) -> CartResult<Cart>;

    /// Creates a brand new empty cart for the session, atomically binding
    /// the two. When creates race on one session, exactly one wins; losers
    /// observe [`SessionCartOutcome::AlreadyExists`] with the winner's cart.
    ///
    /// Fails with `SessionNotFound` if the session is unknown.
    async fn create_for_session(&self, session_token: &str) -> CartResult<SessionCartOutcome>;

    /// Creates an empty cart without binding it to any session.
    async fn create_unbound(&self) -> CartResult<Cart>;

    /// Replaces the stored cart matching `cart.id` wholesale. Does not check
    /// permissions and must only be called after the user has been
    /// authorized.
    ///
    /// Fails with `CartNotFound` if no cart matches.
    async fn replace(&self, cart: Cart) -> CartResult<()>;

    /// Deletes the cart matching the ID, together with any session binding
    /// that points at it. Does not check permissions and must only be called
    /// after the user has been authorized.
    ///
    /// Fails with `CartNotFound` if no cart matches.
    async fn delete(&self, cart_id: &str) -> CartResult<()>;
}

// =============================================================================
// User Context Resolver
// =============================================================================

/// Derives the session token and optional user identity from an inbound
/// request's headers.
#[async_trait]
pub trait UserContextResolver: Send + Sync {
    /// Fails with `SessionNotFound` if no session can be derived from the
    /// request.
    async fn user_context(&self, headers: &HeaderMap) -> CartResult<UserContext>;
}

// =============================================================================
// Authorizer
// =============================================================================

/// Decides whether the requesting principal may perform an operation on a
/// resource.
///
/// Only the admin handler family consults the authorizer; session-scoped
/// routes authorize implicitly through session ownership.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Fails with `NotAuthorized` (carrying the denied operation and
    /// resource ID) when policy denies the principal, and with `Internal`
    /// on infrastructure failure. The two are never conflated: a denial is
    /// 403 regardless of whether the resource exists.
    async fn authorize(
        &self,
        headers: &HeaderMap,
        operation: Operation,
        resource_id: &str,
    ) -> CartResult<()>;
}
