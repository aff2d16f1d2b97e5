//! # kaimono-service: HTTP Service Layer for Kaimono
//!
//! The request-authorization-and-dispatch core of the cart service: route
//! handlers, the authorization gate, and the storage seam.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         kaimono-service                                 │
//! │                                                                         │
//! │  /cart (session-scoped)              /admin/cart (ID-scoped)            │
//! │  ┌────────────────────────┐          ┌────────────────────────┐         │
//! │  │ GET / POST / PUT / DEL │          │ GET / POST / PUT / DEL │         │
//! │  │                        │          │                        │         │
//! │  │ resolve session ──────►│          │ authorize ────────────►│         │
//! │  │ store op               │          │ store op               │         │
//! │  │ classify → envelope    │          │ classify → envelope    │         │
//! │  └────────────────────────┘          └────────────────────────┘         │
//! │                                                                         │
//! │  The two families split deliberately: admin routes are identity-gated  │
//! │  (explicit Authorizer call), session routes are session-gated          │
//! │  (ownership is the authorization).                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`service`] - [`CartService`] and router assembly
//! - [`store`] - the collaborator traits (store, resolver, authorizer)
//! - [`session`] - session-scoped handlers (`/cart`)
//! - [`admin`] - admin handlers (`/admin/cart`)
//! - [`response`] - the `{data, error}` envelope and status classification
//! - [`memory`] - guarded-map backend implementing all three traits

// =============================================================================
// Module Declarations
// =============================================================================

pub mod admin;
pub mod memory;
pub mod response;
pub mod service;
pub mod session;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use memory::MemoryBackend;
pub use response::{status_for, Envelope};
pub use service::CartService;
pub use store::{Authorizer, CartStore, SessionCartOutcome, UserContextResolver};
