//! # Domain Types
//!
//! Core domain types for the Kaimono cart service.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Cart       │   │    CartItem     │   │    Discount     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (opaque)    │──►│  product_id     │──►│  id             │       │
//! │  │  items          │   │  quantity       │   │  discount_type  │       │
//! │  │  discounts      │   │  price          │   │  magnitude      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   UserContext   │   │    Operation    │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  user_id        │   │  resource       │  Per-request, transient;    │
//! │  │  session_token  │   │  kind (CRUD)    │  never persisted            │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Contract
//! JSON field names are kebab-case (`cart-items`, `product-id`,
//! `percentage-off`) and must stay stable: existing clients depend on them.
//!
//! ## Identity Rules
//! - `Cart.id` is server-assigned at creation and never changes.
//! - Update payloads are reconciled against the server's known ID; the
//!   client-supplied ID in a body is never trusted.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Cart Aggregate
// =============================================================================

/// The cart aggregate root: a shopping session's selected items and
/// cart-level discounts.
///
/// Carts are replaced wholesale on update; handlers never mutate one field
/// at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Server-assigned opaque identifier.
    pub id: String,

    /// Ordered line items.
    #[serde(rename = "cart-items", default)]
    pub items: Vec<CartItem>,

    /// Cart-level discounts.
    #[serde(default)]
    pub discounts: Vec<Discount>,
}

impl Cart {
    /// Creates an empty cart with the given server-assigned ID.
    pub fn empty(id: impl Into<String>) -> Self {
        Cart {
            id: id.into(),
            items: Vec::new(),
            discounts: Vec::new(),
        }
    }
}

/// A single line in a cart: one product, a positive quantity, the unit
/// price, and any item-level discounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product reference.
    #[serde(rename = "product-id")]
    pub product_id: String,

    /// Number of units. Always positive.
    pub quantity: u32,

    /// Item-level discounts.
    #[serde(default)]
    pub discounts: Vec<Discount>,

    /// Unit price.
    pub price: Price,
}

/// A currency-tagged decimal amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub currency: Currency,
    pub value: f64,
}

// =============================================================================
// Discounts
// =============================================================================

/// A discount applied at cart or item level.
///
/// The magnitude field that applies depends on [`DiscountType`]:
/// `percentage` reads `percentage-off` (0-100 fraction off), `fixed-amount`
/// reads `amount-off` (absolute amount off, in the currency of the line it
/// applies to).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub id: String,

    #[serde(rename = "type")]
    pub discount_type: DiscountType,

    #[serde(rename = "percentage-off", default)]
    pub percentage_off: f64,

    #[serde(rename = "amount-off", default)]
    pub amount_off: f64,
}

/// Discount interpretation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountType {
    #[serde(rename = "percentage")]
    Percentage,
    #[serde(rename = "fixed-amount")]
    FixedAmount,
}

/// ISO 4217-style three letter currency code, lowercased on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "usd")]
    Usd,
    #[serde(rename = "euro")]
    Euro,
    #[serde(rename = "bitcoin")]
    Bitcoin,
}

// =============================================================================
// User Context
// =============================================================================

/// The principal derived from an inbound request.
///
/// Transient: resolved per request by a `UserContextResolver`, never
/// persisted by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserContext {
    /// Identity of the logged-in user. Empty string means anonymous.
    pub user_id: String,

    /// The session this request belongs to.
    pub session_token: String,
}

impl UserContext {
    /// True when the request carries a known user identity.
    pub fn is_logged_in(&self) -> bool {
        !self.user_id.is_empty()
    }
}

// =============================================================================
// Operations
// =============================================================================

/// An intended action on a resource, passed to the authorizer for policy
/// evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Resource family the operation targets (e.g. `"cart"`).
    pub resource: String,

    /// CRUD verb.
    #[serde(rename = "type")]
    pub kind: OperationType,
}

impl Operation {
    /// An operation on the cart resource.
    pub fn cart(kind: OperationType) -> Self {
        Operation {
            resource: "cart".to_string(),
            kind,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.resource)
    }
}

/// CRUD verb for authorization decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    #[serde(rename = "create")]
    Create,
    #[serde(rename = "read")]
    Read,
    #[serde(rename = "update")]
    Update,
    #[serde(rename = "delete")]
    Delete,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationType::Create => "create",
            OperationType::Read => "read",
            OperationType::Update => "update",
            OperationType::Delete => "delete",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
