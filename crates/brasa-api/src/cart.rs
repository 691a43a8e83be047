//! # Cart Endpoints
//!
//! ```text
//! GET    /cart/{cart_id}                   fetch_cart
//! GET    /cart/me                          fetch_my_cart
//! POST   /cart/items                       add_item
//! PUT    /cart/{cart_id}/items/{item_id}   update_item
//! DELETE /cart/{cart_id}/items/{item_id}   remove_item
//! DELETE /cart/{cart_id}                   clear_cart
//! POST   /cart/claim                       claim_cart
//! POST   /cart/{cart_id}/validate          validate_cart
//! ```
//!
//! ## Response Envelopes
//! The backend wraps carts inconsistently. [`normalize_cart`] accepts all of:
//! ```text
//! { "cart": { "id": .., "items": [..], "summary": { "total": .. } } }
//! { "data": { "cart_id": .., "cart_items": [..], "total": .. } }
//! { "id": .., "products": [..], "total_amount": .. }
//! ```
//! Mutation endpoints sometimes answer with the changed line instead of the
//! cart. When no item list is found the client re-fetches the cart.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use brasa_core::types::decode_list;
use brasa_core::wire::{self, Record};
use brasa_core::{CartItem, CartSnapshot, ErrorKind};

use crate::client::{path_segment, ApiClient};
use crate::error::ApiResult;

const ENVELOPE_KEYS: &[&str] = &["cart", "data"];
const ITEM_LIST_KEYS: &[&str] = &["items", "cart_items", "products"];
const CART_ID_KEYS: &[&str] = &["cart_id", "cartId"];
const TOTAL_KEYS: &[&str] = &["total", "total_amount", "subtotal"];

// =============================================================================
// Request Payloads
// =============================================================================

/// An extra chosen for a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraSelection {
    pub ingredient_id: String,
    pub quantity: i64,
}

/// A change to the base recipe of a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModificationSelection {
    pub ingredient_id: String,
    pub delta: i64,
}

/// Body of `POST /cart/items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddItemRequest {
    /// Guest cart to add to. Omitted for signed-in customers and first adds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<String>,
    pub product_id: String,
    pub quantity: i64,
    pub extras: Vec<ExtraSelection>,
    pub base_modifications: Vec<ModificationSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PUT /cart/{cart_id}/items/{item_id}`. Absent fields are unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<Vec<ExtraSelection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// Validation Report
// =============================================================================

/// One problem reported by checkout validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub item_id: Option<String>,
    pub code: Option<String>,
    pub message: String,
    pub kind: ErrorKind,
}

impl From<Record> for ValidationIssue {
    fn from(record: Record) -> Self {
        let code = wire::text(&record, &["code", "error_code"]);
        let message = wire::text(&record, &["message", "error", "reason"])
            .unwrap_or_else(|| "Item is not available".to_string());
        // Unrecognised issues fall back to the 422 mapping: Validation.
        let kind = ErrorKind::classify(422, code.as_deref(), Some(&message));

        ValidationIssue {
            item_id: wire::id(&record, &["item_id", "cart_item_id", "itemId"]),
            code,
            message,
            kind,
        }
    }
}

/// Result of `POST /cart/{cart_id}/validate`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Reads `{valid, issues|errors|items}`. An empty body means valid.
    pub fn from_value(value: &Value) -> Self {
        let Some(record) = value.as_object() else {
            return ValidationReport::default();
        };
        let record = ENVELOPE_KEYS
            .iter()
            .find_map(|key| wire::object(record, key))
            .unwrap_or(record);

        let mut issues: Vec<ValidationIssue> = wire::array(record, &["issues", "errors", "invalid_items"])
            .map(|values| decode_list(values))
            .unwrap_or_default();

        let flagged_invalid = record.get("valid").and_then(Value::as_bool) == Some(false);
        if flagged_invalid && issues.is_empty() {
            let message = wire::text(record, &["message", "error"]).unwrap_or_else(|| "Cart is not valid".to_string());
            issues.push(ValidationIssue {
                item_id: None,
                code: None,
                kind: ErrorKind::classify(422, None, Some(&message)),
                message,
            });
        }

        ValidationReport { issues }
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_stock_shortage(&self) -> bool {
        self.issues.iter().any(|i| i.kind == ErrorKind::InsufficientStock)
    }
}

// =============================================================================
// Response Normalisation
// =============================================================================

/// Finds the cart object inside a response. At most two envelopes deep.
fn locate_cart(value: &Value) -> Option<&Record> {
    let mut record = value.as_object()?;
    for _ in 0..2 {
        match ENVELOPE_KEYS.iter().find_map(|key| wire::object(record, key)) {
            Some(inner) => record = inner,
            None => break,
        }
    }
    Some(record)
}

/// Returns true when the response carries a cart item list.
pub fn carries_cart(value: &Value) -> bool {
    locate_cart(value).is_some_and(|cart| wire::array(cart, ITEM_LIST_KEYS).is_some())
}

/// Reads the cart id from a response, whatever its shape.
pub fn cart_id_of(value: &Value) -> Option<String> {
    let outer = value.as_object()?;
    let cart = locate_cart(value)?;

    wire::id(cart, CART_ID_KEYS)
        .or_else(|| {
            // `id` names the cart only when it sits next to the item list.
            wire::array(cart, ITEM_LIST_KEYS).and_then(|_| wire::id(cart, &["id"]))
        })
        .or_else(|| wire::id(outer, CART_ID_KEYS))
}

/// Normalises any known cart response into a [`CartSnapshot`].
///
/// Missing pieces default to empty: no id, no items, no summary total.
///
/// ```rust
/// use brasa_api::cart::normalize_cart;
/// use brasa_core::Money;
/// use serde_json::json;
///
/// let snapshot = normalize_cart(&json!({
///     "cart": {"id": 5, "items": [{"id": 1, "product_id": 9, "price": 20}], "summary": {"total": 20}}
/// }));
///
/// assert_eq!(snapshot.cart_id.as_deref(), Some("5"));
/// assert_eq!(snapshot.items.len(), 1);
/// assert_eq!(snapshot.summary_total, Some(Money::from_cents(2000)));
/// ```
pub fn normalize_cart(value: &Value) -> CartSnapshot {
    let Some(cart) = locate_cart(value) else {
        return CartSnapshot::empty();
    };

    let items: Vec<CartItem> = wire::array(cart, ITEM_LIST_KEYS)
        .map(|values| decode_list(values))
        .unwrap_or_default();

    let summary_total = wire::object(cart, "summary")
        .and_then(|summary| wire::amount(summary, TOTAL_KEYS))
        .or_else(|| wire::amount(cart, TOTAL_KEYS));

    CartSnapshot {
        cart_id: cart_id_of(value),
        items,
        summary_total,
    }
}

// =============================================================================
// Endpoints
// =============================================================================

impl ApiClient {
    /// `GET /cart/{cart_id}`
    pub async fn fetch_cart(&self, cart_id: &str) -> ApiResult<CartSnapshot> {
        let cart_id = path_segment("cart_id", cart_id)?;
        let body = self.send(Method::GET, &format!("/cart/{}", cart_id), None).await?;

        let mut snapshot = normalize_cart(&body);
        if snapshot.cart_id.is_none() {
            snapshot.cart_id = Some(cart_id.to_string());
        }
        Ok(snapshot)
    }

    /// `GET /cart/me`. The signed-in customer's cart.
    pub async fn fetch_my_cart(&self) -> ApiResult<CartSnapshot> {
        let body = self.send(Method::GET, "/cart/me", None).await?;
        Ok(normalize_cart(&body))
    }

    /// `POST /cart/items`. Creates the cart when `cart_id` is absent.
    pub async fn add_item(&self, request: &AddItemRequest) -> ApiResult<CartSnapshot> {
        info!(
            product_id = %request.product_id,
            quantity = request.quantity,
            cart_id = ?request.cart_id,
            "Adding item to cart"
        );

        let payload = serde_json::to_value(request)?;
        let body = self.send(Method::POST, "/cart/items", Some(&payload)).await?;
        let cart_id = cart_id_of(&body).or_else(|| request.cart_id.clone());
        self.cart_from_mutation(body, cart_id).await
    }

    /// `PUT /cart/{cart_id}/items/{item_id}`
    pub async fn update_item(
        &self,
        cart_id: &str,
        item_id: &str,
        request: &UpdateItemRequest,
    ) -> ApiResult<CartSnapshot> {
        let cart_id = path_segment("cart_id", cart_id)?;
        let item_id = path_segment("item_id", item_id)?;
        debug!(cart_id, item_id, quantity = ?request.quantity, "Updating cart item");

        let path = format!("/cart/{}/items/{}", cart_id, item_id);
        let payload = serde_json::to_value(request)?;
        let body = self.send(Method::PUT, &path, Some(&payload)).await?;
        self.cart_from_mutation(body, Some(cart_id.to_string())).await
    }

    /// `DELETE /cart/{cart_id}/items/{item_id}`
    pub async fn remove_item(&self, cart_id: &str, item_id: &str) -> ApiResult<CartSnapshot> {
        let cart_id = path_segment("cart_id", cart_id)?;
        let item_id = path_segment("item_id", item_id)?;
        debug!(cart_id, item_id, "Removing cart item");

        let path = format!("/cart/{}/items/{}", cart_id, item_id);
        let body = self.send(Method::DELETE, &path, None).await?;
        self.cart_from_mutation(body, Some(cart_id.to_string())).await
    }

    /// `DELETE /cart/{cart_id}`
    pub async fn clear_cart(&self, cart_id: &str) -> ApiResult<()> {
        let cart_id = path_segment("cart_id", cart_id)?;
        info!(cart_id, "Clearing cart");

        self.send(Method::DELETE, &format!("/cart/{}", cart_id), None).await?;
        Ok(())
    }

    /// `POST /cart/claim`. Moves a guest cart into the signed-in customer's cart.
    pub async fn claim_cart(&self, guest_cart_id: &str) -> ApiResult<CartSnapshot> {
        let guest_cart_id = path_segment("guest_cart_id", guest_cart_id)?;
        info!(guest_cart_id, "Claiming guest cart");

        let body = self
            .send(Method::POST, "/cart/claim", Some(&json!({ "guest_cart_id": guest_cart_id })))
            .await?;

        if carries_cart(&body) {
            Ok(normalize_cart(&body))
        } else {
            self.fetch_my_cart().await
        }
    }

    /// `POST /cart/{cart_id}/validate`
    pub async fn validate_cart(&self, cart_id: &str) -> ApiResult<ValidationReport> {
        let cart_id = path_segment("cart_id", cart_id)?;
        let body = self
            .send(Method::POST, &format!("/cart/{}/validate", cart_id), None)
            .await?;

        let report = ValidationReport::from_value(&body);
        debug!(cart_id, issues = report.issues.len(), "Cart validated");
        Ok(report)
    }

    /// Uses the mutation response when it is a cart, otherwise re-fetches.
    async fn cart_from_mutation(&self, body: Value, cart_id: Option<String>) -> ApiResult<CartSnapshot> {
        if carries_cart(&body) {
            let mut snapshot = normalize_cart(&body);
            if snapshot.cart_id.is_none() {
                snapshot.cart_id = cart_id;
            }
            return Ok(snapshot);
        }

        match cart_id {
            Some(id) => {
                debug!(cart_id = %id, "Mutation response has no cart, re-fetching");
                self.fetch_cart(&id).await
            }
            None => Ok(CartSnapshot::empty()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
