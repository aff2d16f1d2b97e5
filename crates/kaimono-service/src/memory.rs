//! # In-Memory Backend
//!
//! A single guarded-map backend implementing all three collaborator traits.
//! It backs the dev server and the handler tests; a transactional store can
//! replace it behind the same traits without touching a handler.
//!
//! ## State Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     MemoryBackend (one RwLock)                          │
//! │                                                                         │
//! │  sessions:      {"logged-in-session", "anonymous-session", ...}        │
//! │  users:         session token ──► UserContext                          │
//! │  admins:        {"test-admin-user", ...}                               │
//! │  carts:         cart ID ──► Cart                                       │
//! │  session_carts: session token ──► cart ID   (at most one per session)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Session resolution is cookie-based: the token rides in a `session`
//! cookie. Authorization is an allowlist of admin user IDs; anyone else,
//! including principals whose session cannot be resolved at all, is denied.
//!
//! `create_for_session` checks and inserts under one write lock, so creates
//! racing on the same session resolve to exactly one winner and every loser
//! observes the winner's cart.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use kaimono_core::{Cart, CartError, CartResult, Operation, UserContext};

use crate::store::{Authorizer, CartStore, SessionCartOutcome, UserContextResolver};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

#[derive(Default)]
struct MemoryState {
    /// Known session tokens.
    sessions: HashSet<String>,
    /// Logged-in users, keyed by session token.
    users: HashMap<String, UserContext>,
    /// User IDs allowed through the admin gate.
    admins: HashSet<String>,
    /// Carts by ID.
    carts: HashMap<String, Cart>,
    /// Session token to cart ID binding.
    session_carts: HashMap<String, String>,
}

/// In-memory store, resolver, and authorizer in one.
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    /// Registers a session token. Sessions unknown to the backend resolve to
    /// `SessionNotFound` on store lookups.
    pub async fn register_session(&self, token: impl Into<String>) {
        let mut state = self.state.write().await;
        state.sessions.insert(token.into());
    }

    /// Registers a logged-in user, including their session.
    pub async fn register_user(&self, ctx: UserContext) {
        let mut state = self.state.write().await;
        state.sessions.insert(ctx.session_token.clone());
        state.users.insert(ctx.session_token.clone(), ctx);
    }

    /// Adds a user ID to the admin allowlist.
    pub async fn grant_admin(&self, user_id: impl Into<String>) {
        let mut state = self.state.write().await;
        state.admins.insert(user_id.into());
    }
}

/// Pulls the session token out of the `session` cookie, if present.
fn cookie_session(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .map(str::to_string)
    })
}

// =============================================================================
// CartStore
// =============================================================================

#[async_trait]
impl CartStore for MemoryBackend {
    async fn lookup(&self, cart_id: &str) -> CartResult<Cart> {
        let state = self.state.read().await;
        state.carts.get(cart_id).cloned().ok_or(CartError::CartNotFound)
    }

    async fn lookup_for_session(&self, session_token: &str) -> CartResult<Cart> {
        let state = self.state.read().await;
        if !state.sessions.contains(session_token) {
            return Err(CartError::SessionNotFound);
        }
        let cart_id = state
            .session_carts
            .get(session_token)
            .ok_or(CartError::CartNotFound)?;
        state
            .carts
            .get(cart_id)
            .cloned()
            .ok_or_else(|| CartError::Internal(format!("session bound to missing cart {cart_id}")))
    }

    async fn create_for_session(&self, session_token: &str) -> CartResult<SessionCartOutcome> {
        // Check and insert under one write lock: one winner per session.
        let mut state = self.state.write().await;
        if !state.sessions.contains(session_token) {
            return Err(CartError::SessionNotFound);
        }

        if let Some(cart_id) = state.session_carts.get(session_token) {
            let existing = state.carts.get(cart_id).cloned().ok_or_else(|| {
                CartError::Internal(format!("session bound to missing cart {cart_id}"))
            })?;
            return Ok(SessionCartOutcome::AlreadyExists(existing));
        }

        let cart = Cart::empty(Uuid::new_v4().to_string());
        debug!(cart_id = %cart.id, "created cart for session");
        state.carts.insert(cart.id.clone(), cart.clone());
        state
            .session_carts
            .insert(session_token.to_string(), cart.id.clone());
        Ok(SessionCartOutcome::Created(cart))
    }

    async fn create_unbound(&self) -> CartResult<Cart> {
        let mut state = self.state.write().await;
        let cart = Cart::empty(Uuid::new_v4().to_string());
        debug!(cart_id = %cart.id, "created unbound cart");
        state.carts.insert(cart.id.clone(), cart.clone());
        Ok(cart)
    }

    async fn replace(&self, cart: Cart) -> CartResult<()> {
        let mut state = self.state.write().await;
        match state.carts.get_mut(&cart.id) {
            Some(slot) => {
                *slot = cart;
                Ok(())
            }
            None => Err(CartError::CartNotFound),
        }
    }

    async fn delete(&self, cart_id: &str) -> CartResult<()> {
        let mut state = self.state.write().await;
        if state.carts.remove(cart_id).is_none() {
            return Err(CartError::CartNotFound);
        }
        state.session_carts.retain(|_, bound| bound != cart_id);
        Ok(())
    }
}

// =============================================================================
// UserContextResolver
// =============================================================================

#[async_trait]
impl UserContextResolver for MemoryBackend {
    async fn user_context(&self, headers: &HeaderMap) -> CartResult<UserContext> {
        let token = cookie_session(headers).ok_or(CartError::SessionNotFound)?;

        let state = self.state.read().await;
        if let Some(user) = state.users.get(&token) {
            return Ok(user.clone());
        }

        // A token with no logged-in user is an anonymous principal; whether
        // the session itself is known is the store's call.
        Ok(UserContext {
            user_id: String::new(),
            session_token: token,
        })
    }
}

// =============================================================================
// Authorizer
// =============================================================================

#[async_trait]
impl Authorizer for MemoryBackend {
    async fn authorize(
        &self,
        headers: &HeaderMap,
        operation: Operation,
        resource_id: &str,
    ) -> CartResult<()> {
        let state = self.state.read().await;

        // An unresolvable principal on the admin path is a denial, not a bad
        // request: the caller learns nothing about the resource either way.
        let allowed = cookie_session(headers)
            .and_then(|token| state.users.get(&token))
            .is_some_and(|user| state.admins.contains(&user.user_id));

        if allowed {
            return Ok(());
        }

        Err(CartError::NotAuthorized {
            operation,
            resource_id: resource_id.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
