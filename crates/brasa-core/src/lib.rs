//! # brasa-core: Pure Cart Logic for the Brasa Storefront
//!
//! This crate holds the pricing and reconciliation rules of the storefront
//! cart as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Brasa Client Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    brasa CLI (apps/cli)                          │   │
//! │  │        show ──► add ──► set-qty ──► remove ──► validate          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              brasa-basket (BasketStore state holder)             │   │
//! │  └──────────────┬───────────────────────────────┬──────────────────┘   │
//! │                 │                               │                       │
//! │  ┌──────────────▼──────────────┐   ┌────────────▼──────────────────┐   │
//! │  │  brasa-api (HTTP client)    │   │  brasa-store (SQLite session) │   │
//! │  └──────────────┬──────────────┘   └────────────┬──────────────────┘   │
//! │                 │                               │                       │
//! │  ┌──────────────▼───────────────────────────────▼──────────────────┐   │
//! │  │               ★ brasa-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │ CartItem  │  │   Money   │  │ resolver  │  │   rules   │  │   │
//! │  │   │  Extra    │  │ from_wire │  │ line/cart │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cart line, extras, modifications, price cache, view types
//! - [`money`] - Money type with integer arithmetic
//! - [`pricing`] - Price resolver, line calculator, aggregate reconciler
//! - [`wire`] - Lenient field lookups for backend JSON
//! - [`error`] - Domain errors and backend error classification
//! - [`validation`] - Input checks run before a request is sent
//!
//! ## Example Usage
//!
//! ```rust
//! use brasa_core::pricing::line_total;
//! use brasa_core::{CartItem, Extra, IngredientPriceCache, Money};
//!
//! let item = CartItem::new("line-1", "x-burger", Money::from_cents(2490), 1)
//!     .with_extra(Extra::new("bacon", 1));
//!
//! // Bacon is not in the cache and carries no inline price: it costs zero.
//! let total = line_total(&item, &IngredientPriceCache::new());
//! assert_eq!(total.display.to_string(), "R$ 24,90");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod wire;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in one cart.
pub const MAX_CART_ITEMS: usize = 50;

/// Maximum quantity of a single line.
///
/// Catches a fat-fingered `100` where `10` was meant.
pub const MAX_ITEM_QUANTITY: i64 = 99;

/// Maximum length of the free-text notes on a line.
pub const MAX_NOTES_LEN: usize = 140;
