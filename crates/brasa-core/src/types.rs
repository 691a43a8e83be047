//! # Domain Types
//!
//! Cart types shared by every layer of the storefront client.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CartSnapshot   │   │    CartItem     │   │     Extra       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  cart_id        │──►│  id             │──►│  ingredient_id  │       │
//! │  │  items          │   │  unit_price     │   │  quantity       │       │
//! │  │  summary_total  │   │  quantity       │   │  price_fields   │       │
//! │  └─────────────────┘   │  api_subtotal   │   └─────────────────┘       │
//! │                        └─────────────────┘   ┌─────────────────┐       │
//! │  ┌─────────────────┐   ┌─────────────────┐   │ BaseModification│       │
//! │  │ IngredientPrice │   │   PricedLine    │   │  ─────────────  │       │
//! │  │  (cache entry)  │   │  BasketTotals   │   │  delta (+/-)    │       │
//! │  └─────────────────┘   │  (view types)   │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lenient Decoding
//! Backend records are decoded through [`crate::wire`]: every field has a
//! list of accepted names and a tolerant value parser. Decoding a record never
//! fails; missing data becomes an empty/zero value.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::money::Money;
use crate::wire::{self, Record};

// =============================================================================
// Field Name Tables
// =============================================================================

const LINE_ID_KEYS: &[&str] = &["id", "cart_item_id", "item_id"];
const PRODUCT_ID_KEYS: &[&str] = &["product_id", "productId"];
const PRODUCT_NAME_KEYS: &[&str] = &["product_name", "productName", "name"];
const UNIT_PRICE_KEYS: &[&str] = &["unit_price", "unitPrice", "product_price", "price"];
const QUANTITY_KEYS: &[&str] = &["quantity", "qty"];
const SUBTOTAL_KEYS: &[&str] = &["subtotal", "item_total", "line_total", "total"];
const EXTRAS_KEYS: &[&str] = &["extras", "additionals", "extra_ingredients"];
const MODIFICATION_KEYS: &[&str] = &["base_modifications", "baseModifications", "modifications"];
const NOTES_KEYS: &[&str] = &["notes", "observation", "observations"];
const INGREDIENT_ID_KEYS: &[&str] = &["ingredient_id", "ingredientId", "id"];
const DELTA_KEYS: &[&str] = &["delta", "quantity_delta", "change"];

// =============================================================================
// Extras and Modifications
// =============================================================================

/// An additional ingredient added on top of the product's base recipe.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Record")]
pub struct Extra {
    /// Stringified ingredient id (cache key).
    pub ingredient_id: String,

    /// Units added. Extras with `quantity <= 0` are not priced.
    pub quantity: i64,

    /// The raw record, searched for a price when the cache has none.
    pub price_fields: Record,
}

impl Extra {
    /// Creates an extra with no inline price (price comes from the cache).
    pub fn new(ingredient_id: impl Into<String>, quantity: i64) -> Self {
        Extra {
            ingredient_id: ingredient_id.into(),
            quantity,
            price_fields: Record::new(),
        }
    }

    /// Attaches an inline price under `field`.
    pub fn with_price_field(mut self, field: &str, value: Value) -> Self {
        self.price_fields.insert(field.to_string(), value);
        self
    }
}

impl From<Record> for Extra {
    fn from(record: Record) -> Self {
        Extra {
            ingredient_id: ingredient_id_of(&record),
            // An extra listed without a quantity was added once.
            quantity: wire::int(&record, QUANTITY_KEYS).unwrap_or(1),
            price_fields: with_nested_ingredient(record),
        }
    }
}

/// A change to a base-recipe ingredient: positive adds, negative removes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Record")]
pub struct BaseModification {
    /// Stringified ingredient id (cache key).
    pub ingredient_id: String,

    /// Change relative to the recipe's default quantity.
    pub delta: i64,

    /// The raw record, searched for a price when the cache has none.
    pub price_fields: Record,
}

impl BaseModification {
    pub fn new(ingredient_id: impl Into<String>, delta: i64) -> Self {
        BaseModification {
            ingredient_id: ingredient_id.into(),
            delta,
            price_fields: Record::new(),
        }
    }

    /// Attaches an inline price under `field`.
    pub fn with_price_field(mut self, field: &str, value: Value) -> Self {
        self.price_fields.insert(field.to_string(), value);
        self
    }
}

impl From<Record> for BaseModification {
    fn from(record: Record) -> Self {
        BaseModification {
            ingredient_id: ingredient_id_of(&record),
            delta: wire::int(&record, DELTA_KEYS).unwrap_or(0),
            price_fields: with_nested_ingredient(record),
        }
    }
}

fn ingredient_id_of(record: &Record) -> String {
    wire::id(record, INGREDIENT_ID_KEYS)
        .or_else(|| wire::object(record, "ingredient").and_then(|i| wire::id(i, &["id"])))
        .unwrap_or_default()
}

/// Lifts fields of a nested `ingredient` object that the top level lacks.
fn with_nested_ingredient(mut record: Record) -> Record {
    if let Some(Value::Object(nested)) = record.get("ingredient").cloned() {
        for (key, value) in nested {
            record.entry(key).or_insert(value);
        }
    }
    record
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart as reported by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Record")]
pub struct CartItem {
    /// Line id assigned by the backend.
    pub id: String,

    pub product_id: String,

    /// Display name, when the backend includes one.
    pub product_name: Option<String>,

    /// Base product price. Unparsable prices decode as zero.
    pub unit_price: Money,

    pub quantity: i64,

    pub extras: Vec<Extra>,

    pub base_modifications: Vec<BaseModification>,

    pub notes: Option<String>,

    /// Line subtotal computed by the backend, if it sent one.
    pub api_subtotal: Option<Money>,
}

impl CartItem {
    /// Creates a line with no extras or modifications.
    pub fn new(id: impl Into<String>, product_id: impl Into<String>, unit_price: Money, quantity: i64) -> Self {
        CartItem {
            id: id.into(),
            product_id: product_id.into(),
            product_name: None,
            unit_price,
            quantity,
            extras: Vec::new(),
            base_modifications: Vec::new(),
            notes: None,
            api_subtotal: None,
        }
    }

    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extras.push(extra);
        self
    }

    pub fn with_modification(mut self, modification: BaseModification) -> Self {
        self.base_modifications.push(modification);
        self
    }

    pub fn with_api_subtotal(mut self, subtotal: Money) -> Self {
        self.api_subtotal = Some(subtotal);
        self
    }
}

impl From<Record> for CartItem {
    fn from(record: Record) -> Self {
        let product = wire::object(&record, "product");

        let product_id = wire::id(&record, PRODUCT_ID_KEYS)
            .or_else(|| product.and_then(|p| wire::id(p, &["id"])))
            .unwrap_or_default();

        let product_name = wire::text(&record, PRODUCT_NAME_KEYS)
            .or_else(|| product.and_then(|p| wire::text(p, &["name"])));

        let unit_price = wire::amount(&record, UNIT_PRICE_KEYS)
            .or_else(|| product.and_then(|p| wire::amount(p, &["price"])))
            .unwrap_or_default();

        let extras = wire::array(&record, EXTRAS_KEYS)
            .map(|values| decode_list::<Extra>(values))
            .unwrap_or_default();

        let base_modifications = wire::array(&record, MODIFICATION_KEYS)
            .map(|values| decode_list::<BaseModification>(values))
            .unwrap_or_default();

        CartItem {
            id: wire::id(&record, LINE_ID_KEYS).unwrap_or_default(),
            product_id,
            product_name,
            unit_price,
            // A listed line without a quantity holds one unit.
            quantity: wire::int(&record, QUANTITY_KEYS).unwrap_or(1),
            extras,
            base_modifications,
            notes: wire::text(&record, NOTES_KEYS),
            api_subtotal: wire::amount(&record, SUBTOTAL_KEYS),
        }
    }
}

/// Decodes every object in `values`; non-objects are skipped.
pub fn decode_list<T: From<Record>>(values: &[Value]) -> Vec<T> {
    values
        .iter()
        .filter_map(Value::as_object)
        .map(|record| T::from(record.clone()))
        .collect()
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// The cart as last reported by the backend, already normalised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSnapshot {
    /// Server cart id. `None` until the first item creates a cart.
    pub cart_id: Option<String>,

    pub items: Vec<CartItem>,

    /// Cart summary total reported by the backend.
    pub summary_total: Option<Money>,
}

impl CartSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find_item(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }
}

// =============================================================================
// Ingredient Price Cache
// =============================================================================

/// One entry of the ingredient price cache.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Record")]
pub struct IngredientPrice {
    pub id: String,
    pub name: Option<String>,
    /// Price charged when the ingredient is added as an extra.
    pub additional_price: Option<Money>,
    pub price: Option<Money>,
}

impl From<Record> for IngredientPrice {
    fn from(record: Record) -> Self {
        IngredientPrice {
            id: wire::id(&record, &["id", "ingredient_id"]).unwrap_or_default(),
            name: wire::text(&record, &["name"]),
            additional_price: wire::amount(&record, &["additional_price"]),
            price: wire::amount(&record, &["price"]),
        }
    }
}

/// Pre-fetched ingredient prices keyed by stringified ingredient id.
#[derive(Debug, Clone, Default)]
pub struct IngredientPriceCache {
    entries: HashMap<String, IngredientPrice>,
}

impl IngredientPriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the cache; entries without an id are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = IngredientPrice>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|e| !e.id.is_empty())
            .map(|e| (e.id.clone(), e))
            .collect();
        IngredientPriceCache { entries }
    }

    pub fn get(&self, ingredient_id: &str) -> Option<&IngredientPrice> {
        self.entries.get(ingredient_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// View Types
// =============================================================================

/// A priced line handed to screens. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricedLine {
    pub item_id: String,
    pub product_id: String,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub notes: Option<String>,
    pub unit_price: Money,
    pub extras_total: Money,
    pub modifications_total: Money,
    /// Locally recomputed total.
    pub computed_total: Money,
    /// What the screen shows: `max(computed, api_subtotal)`.
    pub display_total: Money,
}

/// Cart totals summary for screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BasketTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    /// Sum of line display totals.
    pub lines_total: Money,
    pub server_total: Option<Money>,
    /// Grand total shown to the customer.
    pub display_total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cart_item_decodes_aliases() {
        let item: CartItem = serde_json::from_value(json!({
            "cart_item_id": 9,
            "productId": "p-1",
            "unitPrice": "24,90",
            "qty": "2",
            "additionals": [{"ingredientId": 5, "quantity": 1, "price": 3}],
            "modifications": [{"ingredient_id": "7", "delta": -1}],
            "observation": "sem cebola",
            "item_total": 55.8
        }))
        .unwrap();

        assert_eq!(item.id, "9");
        assert_eq!(item.product_id, "p-1");
        assert_eq!(item.unit_price, Money::from_cents(2490));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.extras.len(), 1);
        assert_eq!(item.extras[0].ingredient_id, "5");
        assert_eq!(item.base_modifications[0].delta, -1);
        assert_eq!(item.notes.as_deref(), Some("sem cebola"));
        assert_eq!(item.api_subtotal, Some(Money::from_cents(5580)));
    }

    #[test]
    fn test_cart_item_nested_product() {
        let item: CartItem = serde_json::from_value(json!({
            "id": "line-1",
            "product": {"id": 3, "name": "X-Bacon", "price": 29.9}
        }))
        .unwrap();

        assert_eq!(item.product_id, "3");
        assert_eq!(item.product_name.as_deref(), Some("X-Bacon"));
        assert_eq!(item.unit_price, Money::from_cents(2990));
        assert_eq!(item.quantity, 1);
        assert_eq!(item.api_subtotal, None);
    }

    #[test]
    fn test_cart_item_garbage_never_fails() {
        let item: CartItem = serde_json::from_value(json!({
            "price": "n/a",
            "quantity": "lots",
            "extras": "not-a-list"
        }))
        .unwrap();

        assert_eq!(item.unit_price, Money::zero());
        assert_eq!(item.quantity, 0);
        assert!(item.extras.is_empty());
    }

    #[test]
    fn test_extra_nested_ingredient() {
        let extra: Extra = serde_json::from_value(json!({
            "ingredient": {"id": 12, "additional_price": 4.5},
            "quantity": 2
        }))
        .unwrap();

        assert_eq!(extra.ingredient_id, "12");
        assert_eq!(extra.quantity, 2);
        assert_eq!(extra.price_fields.get("additional_price"), Some(&json!(4.5)));
    }

    #[test]
    fn test_decode_list_skips_non_objects() {
        let extras: Vec<Extra> = decode_list(&[json!(1), json!({"id": "a"}), json!(null)]);
        assert_eq!(extras.len(), 1);
        assert_eq!(extras[0].quantity, 1);
    }

    #[test]
    fn test_cache_keys_and_drops_missing_ids() {
        let cache = IngredientPriceCache::from_entries(vec![
            IngredientPrice::from(
                serde_json::from_value::<Record>(json!({"id": 1, "price": 2})).unwrap(),
            ),
            IngredientPrice::from(serde_json::from_value::<Record>(json!({"price": 9})).unwrap()),
        ]);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("1").and_then(|e| e.price), Some(Money::from_cents(200)));
    }
}
