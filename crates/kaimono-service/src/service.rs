//! # Cart Service
//!
//! Bundles the three injected collaborators and assembles the full router.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Request Dispatch                                 │
//! │                                                                         │
//! │  inbound request                                                        │
//! │       │                                                                 │
//! │       ├── /cart (session path) ────► UserContextResolver               │
//! │       │                                   │                             │
//! │       └── /admin/cart (admin path) ──► Authorizer gate                 │
//! │                                           │                             │
//! │                                           ▼                             │
//! │                                      CartStore op                       │
//! │                                           │                             │
//! │                                           ▼                             │
//! │                            error classified to status code             │
//! │                                           │                             │
//! │                                           ▼                             │
//! │                                 {data, error} envelope                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use axum::Router;

use crate::store::{Authorizer, CartStore, UserContextResolver};
use crate::{admin, session};

/// The cart service: handlers plus their injected collaborators.
///
/// No cross-request mutable state lives here; each request is handled
/// independently and all shared state belongs to the store behind its own
/// synchronization discipline.
pub struct CartService {
    pub(crate) store: Arc<dyn CartStore>,
    pub(crate) resolver: Arc<dyn UserContextResolver>,
    pub(crate) authorizer: Arc<dyn Authorizer>,
}

impl CartService {
    /// Creates a new service over the given collaborators.
    pub fn new(
        store: Arc<dyn CartStore>,
        resolver: Arc<dyn UserContextResolver>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        CartService {
            store,
            resolver,
            authorizer,
        }
    }

    /// Builds the full router: session routes under `/cart`, admin routes
    /// under `/admin/cart`.
    pub fn router(self) -> Router {
        let state = Arc::new(self);
        Router::new()
            .merge(session::router())
            .merge(admin::router())
            .with_state(state)
    }
}
