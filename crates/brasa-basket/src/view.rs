//! # Basket View
//!
//! The read-only picture of the basket handed to screens. Built from the
//! current snapshot and price cache on every change; screens never see the
//! raw backend records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use brasa_core::pricing::price_cart;
use brasa_core::{BasketTotals, CartSnapshot, IngredientPriceCache, Money, PricedLine};

/// Priced basket as shown on screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketView {
    pub cart_id: Option<String>,
    pub lines: Vec<PricedLine>,
    pub totals: BasketTotals,
    pub initialized: bool,
    pub signed_in: bool,
    pub updated_at: DateTime<Utc>,
}

impl BasketView {
    /// View of a basket that has not been loaded yet.
    pub fn blank() -> Self {
        BasketView {
            cart_id: None,
            lines: Vec::new(),
            totals: BasketTotals::default(),
            initialized: false,
            signed_in: false,
            updated_at: Utc::now(),
        }
    }

    pub(crate) fn price(
        snapshot: &CartSnapshot,
        cache: &IngredientPriceCache,
        initialized: bool,
        signed_in: bool,
    ) -> Self {
        let (lines, totals) = price_cart(snapshot, cache);
        BasketView {
            cart_id: snapshot.cart_id.clone(),
            lines,
            totals,
            initialized,
            signed_in,
            updated_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, item_id: &str) -> Option<&PricedLine> {
        self.lines.iter().find(|line| line.item_id == item_id)
    }

    /// Grand total shown to the customer.
    pub fn total(&self) -> Money {
        self.totals.display_total
    }
}
