//! # Pricing Module
//!
//! Client-side cart pricing: one resolver, one line calculator, one
//! aggregate reconciler. Every screen that shows a price goes through here.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Pricing Pipeline                            │
//! │                                                                         │
//! │  Extra / BaseModification                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resolve_price(record, id, cache) ← cache.additional_price              │
//! │       │                             → cache.price                       │
//! │       │                             → record candidate fields           │
//! │       │                             → 0                                 │
//! │       ▼                                                                 │
//! │  line_total(item, cache)                                                │
//! │       unit × qty + Σ extra × qty + Σ mod × max(delta, 0)                │
//! │       display = max(computed, api_subtotal)   (api_subtotal > 0)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  reconcile_total(lines, server_total)                                   │
//! │       max(server_total, Σ lines)              (server_total > 0)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The `max(computed, server)` Rule
//! The backend's subtotals are occasionally stale or zero right after a
//! mutation. Showing the larger of the two figures keeps the screen from
//! flashing `R$ 0,00`. The rule is isolated in [`prefer_larger`] so it can be
//! dropped in one place.
//!
//! ## Failure Mode
//! Nothing here returns an error. Unresolvable prices resolve to zero and
//! unreadable quantities count as zero.

use tracing::debug;

use crate::money::Money;
use crate::types::{BasketTotals, CartItem, CartSnapshot, IngredientPriceCache, PricedLine};
use crate::wire::{self, Record};

/// Record fields that may carry a unit price, in precedence order.
pub const PRICE_FIELD_CANDIDATES: &[&str] = &[
    "additional_price",
    "additionalPrice",
    "unit_price",
    "unitPrice",
    "price",
    "extra_price",
    "ingredient_price",
    "value",
];

// =============================================================================
// Ingredient Price Resolver
// =============================================================================

/// Resolves the unit price of an extra or modification.
///
/// ## Precedence
/// 1. `cache[ingredient_id].additional_price`
/// 2. `cache[ingredient_id].price`
/// 3. first non-null of [`PRICE_FIELD_CANDIDATES`] on `record`
/// 4. zero
///
/// A present zero is a price, not a miss. The result is never negative.
///
/// ```rust
/// use brasa_core::pricing::resolve_price;
/// use brasa_core::{IngredientPriceCache, Money};
/// use serde_json::json;
///
/// let record = serde_json::from_value(json!({"unitPrice": "2,50"})).unwrap();
/// let cache = IngredientPriceCache::new();
///
/// assert_eq!(resolve_price(&record, "42", &cache), Money::from_cents(250));
/// ```
pub fn resolve_price(record: &Record, ingredient_id: &str, cache: &IngredientPriceCache) -> Money {
    let cached = cache
        .get(ingredient_id)
        .and_then(|entry| entry.additional_price.or(entry.price));

    let resolved = cached.or_else(|| wire::amount(record, PRICE_FIELD_CANDIDATES));

    match resolved {
        Some(price) => price.non_negative(),
        None => {
            debug!(ingredient_id = %ingredient_id, "No price found for ingredient, charging zero");
            Money::zero()
        }
    }
}

// =============================================================================
// Cart Item Total Calculator
// =============================================================================

/// The breakdown of one line's price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineTotal {
    pub base: Money,
    pub extras: Money,
    pub modifications: Money,
    /// `base + extras + modifications`.
    pub computed: Money,
    /// `max(computed, api_subtotal)` when the backend sent a positive subtotal.
    pub display: Money,
}

/// Prices one cart line.
///
/// - extras with `quantity <= 0` are skipped
/// - modifications contribute `price × max(delta, 0)`, so removals are free
/// - a negative line quantity counts as zero
///
/// ```rust
/// use brasa_core::pricing::line_total;
/// use brasa_core::{CartItem, Extra, IngredientPriceCache, Money};
/// use serde_json::json;
///
/// let item = CartItem::new("1", "burger", Money::from_cents(1000), 2)
///     .with_extra(Extra::new("bacon", 2).with_price_field("price", json!(3)));
///
/// let total = line_total(&item, &IngredientPriceCache::new());
/// assert_eq!(total.computed, Money::from_cents(2600));
/// ```
pub fn line_total(item: &CartItem, cache: &IngredientPriceCache) -> LineTotal {
    let base = item.unit_price.non_negative().multiply_quantity(item.quantity.max(0));

    let extras: Money = item
        .extras
        .iter()
        .filter(|extra| extra.quantity > 0)
        .map(|extra| {
            resolve_price(&extra.price_fields, &extra.ingredient_id, cache)
                .multiply_quantity(extra.quantity)
        })
        .sum();

    let modifications: Money = item
        .base_modifications
        .iter()
        .filter(|modification| modification.delta > 0)
        .map(|modification| {
            resolve_price(&modification.price_fields, &modification.ingredient_id, cache)
                .multiply_quantity(modification.delta)
        })
        .sum();

    let computed = base + extras + modifications;

    LineTotal {
        base,
        extras,
        modifications,
        computed,
        display: prefer_larger(computed, item.api_subtotal),
    }
}

/// Returns `max(local, server)` when `server` is present and positive.
pub fn prefer_larger(local: Money, server: Option<Money>) -> Money {
    match server {
        Some(server) if server.is_positive() => local.max(server),
        _ => local,
    }
}

// =============================================================================
// Cart Aggregate Reconciler
// =============================================================================

/// Picks the grand total to display.
///
/// `max(server_total, Σ line totals)` when the server total is positive,
/// otherwise the summed value.
///
/// ```rust
/// use brasa_core::pricing::reconcile_total;
/// use brasa_core::Money;
///
/// let lines = [Money::from_cents(1500), Money::from_cents(900)];
/// assert_eq!(reconcile_total(&lines, Some(Money::zero())), Money::from_cents(2400));
/// assert_eq!(reconcile_total(&lines, Some(Money::from_cents(3000))), Money::from_cents(3000));
/// ```
pub fn reconcile_total(line_totals: &[Money], server_total: Option<Money>) -> Money {
    let summed: Money = line_totals.iter().sum();
    let displayed = prefer_larger(summed, server_total);

    if let Some(server) = server_total {
        if server.is_positive() && server != summed {
            debug!(
                server_cents = server.cents(),
                summed_cents = summed.cents(),
                displayed_cents = displayed.cents(),
                "Server cart total differs from summed lines"
            );
        }
    }

    displayed
}

// =============================================================================
// Whole Cart
// =============================================================================

/// Prices every line of a snapshot and reconciles the grand total.
pub fn price_cart(snapshot: &CartSnapshot, cache: &IngredientPriceCache) -> (Vec<PricedLine>, BasketTotals) {
    let lines: Vec<PricedLine> = snapshot
        .items
        .iter()
        .map(|item| {
            let total = line_total(item, cache);
            PricedLine {
                item_id: item.id.clone(),
                product_id: item.product_id.clone(),
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                notes: item.notes.clone(),
                unit_price: item.unit_price.non_negative(),
                extras_total: total.extras,
                modifications_total: total.modifications,
                computed_total: total.computed,
                display_total: total.display,
            }
        })
        .collect();

    let line_totals: Vec<Money> = lines.iter().map(|l| l.display_total).collect();
    let display_total = reconcile_total(&line_totals, snapshot.summary_total);

    let totals = BasketTotals {
        item_count: lines.len(),
        total_quantity: lines.iter().map(|l| l.quantity.max(0)).sum(),
        lines_total: line_totals.iter().sum(),
        server_total: snapshot.summary_total,
        display_total,
    };

    (lines, totals)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BaseModification, Extra, IngredientPrice};
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    fn cache_entry(id: &str, additional: Option<i64>, price: Option<i64>) -> IngredientPrice {
        IngredientPrice {
            id: id.to_string(),
            name: None,
            additional_price: additional.map(Money::from_cents),
            price: price.map(Money::from_cents),
        }
    }

    #[test]
    fn test_resolver_cache_additional_price_first() {
        let cache = IngredientPriceCache::from_entries(vec![cache_entry("7", Some(400), Some(900))]);
        let rec = record(json!({"price": 1}));
        assert_eq!(resolve_price(&rec, "7", &cache), Money::from_cents(400));
    }

    #[test]
    fn test_resolver_cache_price_second() {
        let cache = IngredientPriceCache::from_entries(vec![cache_entry("7", None, Some(900))]);
        let rec = record(json!({"price": 1}));
        assert_eq!(resolve_price(&rec, "7", &cache), Money::from_cents(900));
    }

    #[test]
    fn test_resolver_cache_zero_is_a_price() {
        let cache = IngredientPriceCache::from_entries(vec![cache_entry("7", Some(0), Some(900))]);
        assert_eq!(resolve_price(&Record::new(), "7", &cache), Money::zero());
    }

    #[test]
    fn test_resolver_record_candidate_order() {
        let cache = IngredientPriceCache::new();
        let rec = record(json!({"value": 9, "price": 2, "unitPrice": null}));
        assert_eq!(resolve_price(&rec, "x", &cache), Money::from_cents(200));
    }

    #[test]
    fn test_resolver_cache_entry_without_prices_falls_to_record() {
        let cache = IngredientPriceCache::from_entries(vec![cache_entry("7", None, None)]);
        let rec = record(json!({"extra_price": "1,25"}));
        assert_eq!(resolve_price(&rec, "7", &cache), Money::from_cents(125));
    }

    #[test]
    fn test_resolver_missing_everywhere_is_zero() {
        let cache = IngredientPriceCache::new();
        assert_eq!(resolve_price(&Record::new(), "missing", &cache), Money::zero());
    }

    #[test]
    fn test_resolver_nan_and_negative_are_zero() {
        let cache = IngredientPriceCache::new();
        assert_eq!(
            resolve_price(&record(json!({"price": "abc"})), "x", &cache),
            Money::zero()
        );
        assert_eq!(
            resolve_price(&record(json!({"price": -4})), "x", &cache),
            Money::zero()
        );
    }

    #[test]
    fn test_line_total_worked_example() {
        // unit 10, qty 2, one extra (price 3, qty 2) → 26
        let item = CartItem::new("1", "p", Money::from_cents(1000), 2)
            .with_extra(Extra::new("e", 2).with_price_field("price", json!(3)));
        let total = line_total(&item, &IngredientPriceCache::new());

        assert_eq!(total.base, Money::from_cents(2000));
        assert_eq!(total.extras, Money::from_cents(600));
        assert_eq!(total.computed, Money::from_cents(2600));
        assert_eq!(total.display, Money::from_cents(2600));
    }

    #[test]
    fn test_removal_is_free() {
        let item = CartItem::new("1", "p", Money::from_cents(1000), 1)
            .with_modification(BaseModification::new("onion", -1).with_price_field("price", json!(5)));
        let total = line_total(&item, &IngredientPriceCache::new());

        assert_eq!(total.modifications, Money::zero());
        assert_eq!(total.computed, Money::from_cents(1000));
    }

    #[test]
    fn test_positive_delta_is_charged() {
        let cache = IngredientPriceCache::from_entries(vec![cache_entry("cheese", Some(250), None)]);
        let item = CartItem::new("1", "p", Money::from_cents(1000), 1)
            .with_modification(BaseModification::new("cheese", 2));
        assert_eq!(line_total(&item, &cache).modifications, Money::from_cents(500));
    }

    #[test]
    fn test_zero_quantity_extra_excluded() {
        let item = CartItem::new("1", "p", Money::from_cents(1000), 1)
            .with_extra(Extra::new("e", 0).with_price_field("price", json!(3)))
            .with_extra(Extra::new("f", -2).with_price_field("price", json!(3)));
        assert_eq!(line_total(&item, &IngredientPriceCache::new()).extras, Money::zero());
    }

    #[test]
    fn test_api_subtotal_larger_wins() {
        let item = CartItem::new("1", "p", Money::from_cents(1000), 1)
            .with_api_subtotal(Money::from_cents(1400));
        let total = line_total(&item, &IngredientPriceCache::new());
        assert_eq!(total.computed, Money::from_cents(1000));
        assert_eq!(total.display, Money::from_cents(1400));
    }

    #[test]
    fn test_api_subtotal_smaller_or_zero_ignored() {
        let cache = IngredientPriceCache::new();
        let smaller = CartItem::new("1", "p", Money::from_cents(1000), 1)
            .with_api_subtotal(Money::from_cents(800));
        assert_eq!(line_total(&smaller, &cache).display, Money::from_cents(1000));

        let zero = CartItem::new("1", "p", Money::from_cents(1000), 1).with_api_subtotal(Money::zero());
        assert_eq!(line_total(&zero, &cache).display, Money::from_cents(1000));
    }

    #[test]
    fn test_negative_line_quantity_counts_as_zero() {
        let item = CartItem::new("1", "p", Money::from_cents(1000), -3);
        assert_eq!(line_total(&item, &IngredientPriceCache::new()).base, Money::zero());
    }

    #[test]
    fn test_reconcile_total() {
        let lines = [Money::from_cents(1000), Money::from_cents(500)];
        assert_eq!(reconcile_total(&lines, None), Money::from_cents(1500));
        assert_eq!(reconcile_total(&lines, Some(Money::zero())), Money::from_cents(1500));
        assert_eq!(reconcile_total(&lines, Some(Money::from_cents(1200))), Money::from_cents(1500));
        assert_eq!(reconcile_total(&lines, Some(Money::from_cents(1800))), Money::from_cents(1800));
        assert_eq!(reconcile_total(&[], Some(Money::from_cents(-5))), Money::zero());
    }

    #[test]
    fn test_price_cart_from_backend_payload() {
        let item: CartItem = serde_json::from_value(json!({
            "id": 1,
            "product_id": 10,
            "unit_price": 20,
            "quantity": 1,
            "extras": [{"ingredient_id": 3, "quantity": 2}],
            "base_modifications": [{"ingredient_id": 4, "delta": -1, "price": 2}]
        }))
        .unwrap();
        let snapshot = CartSnapshot {
            cart_id: Some("c1".into()),
            items: vec![item],
            summary_total: Some(Money::zero()),
        };
        let cache = IngredientPriceCache::from_entries(vec![cache_entry("3", Some(350), None)]);

        let (lines, totals) = price_cart(&snapshot, &cache);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].extras_total, Money::from_cents(700));
        assert_eq!(lines[0].modifications_total, Money::zero());
        assert_eq!(lines[0].display_total, Money::from_cents(2700));
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.total_quantity, 1);
        assert_eq!(totals.display_total, Money::from_cents(2700));
    }

    #[test]
    fn test_price_empty_cart() {
        let (lines, totals) = price_cart(&CartSnapshot::empty(), &IngredientPriceCache::new());
        assert!(lines.is_empty());
        assert_eq!(totals, BasketTotals::default());
    }
}
