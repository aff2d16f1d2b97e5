//! # kaimono-core: Pure Domain Model for Kaimono
//!
//! This crate is the **heart** of the Kaimono cart service. It holds the
//! domain types and the error taxonomy, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Kaimono Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP Clients                                 │   │
//! │  │     GET/POST/PUT/DELETE /cart and /admin/cart/{id}              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kaimono-service                              │   │
//! │  │     Handlers, authorization gate, envelope, store traits        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kaimono-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐                    ┌───────────┐                │   │
//! │  │   │   types   │                    │   error   │                │   │
//! │  │   │   Cart    │                    │ CartError │                │   │
//! │  │   │ Discount  │                    │ taxonomy  │                │   │
//! │  │   └───────────┘                    └───────────┘                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO HTTP • NO ASYNC • PURE TYPES                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Cart, CartItem, Discount, UserContext, Operation)
//! - [`error`] - The error taxonomy every collaborator reports in
//!
//! ## Design Principles
//!
//! 1. **Stable Wire Contract**: JSON field names (kebab-case) never change
//! 2. **No I/O**: HTTP, storage, and async live in downstream crates
//! 3. **Explicit Errors**: All errors are typed enum variants, never strings
//!    or panics, so the service layer can switch on kinds

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kaimono_core::Cart` instead of
// `use kaimono_core::types::Cart`

pub use error::{CartError, CartResult};
pub use types::*;
