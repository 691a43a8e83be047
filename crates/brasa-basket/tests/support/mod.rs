//! In-memory cart backend for basket tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use brasa_api::{
    AddItemRequest, ApiError, ApiResult, CartBackend, UpdateItemRequest, ValidationReport,
};
use brasa_basket::BasketStore;
use brasa_core::{BaseModification, CartItem, CartSnapshot, Extra, IngredientPrice, Money};
use brasa_store::{LocalStore, StoreConfig};

pub const CUSTOMER_CART: &str = "me-1";

#[derive(Default)]
pub struct FakeState {
    pub carts: HashMap<String, CartSnapshot>,
    pub prices: Vec<IngredientPrice>,
    pub token: Option<String>,
    pub calls: Vec<String>,
    pub next_id: u32,
    pub fail_reads: bool,
    pub fail_updates: bool,
    pub fail_clear: bool,
    pub stock_short: bool,
    pub claim_without_id: bool,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    /// Bacon at R$ 4,00 and cheddar at R$ 2,50.
    pub fn with_prices() -> Self {
        let backend = FakeBackend::default();
        backend.set_prices(vec![price("3", 400), price("4", 250)]);
        backend
    }

    pub fn set_prices(&self, prices: Vec<IngredientPrice>) {
        self.state.lock().unwrap().prices = prices;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn cart(&self, cart_id: &str) -> Option<CartSnapshot> {
        self.state.lock().unwrap().carts.get(cart_id).cloned()
    }

    pub fn set(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.state.lock().unwrap());
    }
}

pub fn price(id: &str, cents: i64) -> IngredientPrice {
    IngredientPrice {
        id: id.to_string(),
        name: None,
        additional_price: Some(Money::from_cents(cents)),
        price: None,
    }
}

fn not_found() -> ApiError {
    ApiError::from_response(404, r#"{"message":"Carrinho não encontrado"}"#)
}

fn unavailable() -> ApiError {
    ApiError::from_response(503, "Service Unavailable")
}

fn unit_price(product_id: &str) -> Money {
    match product_id {
        "10" => Money::from_cents(2000),
        _ => Money::from_cents(1000),
    }
}

#[async_trait]
impl CartBackend for FakeBackend {
    async fn fetch_cart(&self, cart_id: Option<&str>) -> ApiResult<CartSnapshot> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("fetch {}", cart_id.unwrap_or("me")));
        if state.fail_reads {
            return Err(unavailable());
        }

        match cart_id {
            Some(id) => state.carts.get(id).cloned().ok_or_else(not_found),
            None => {
                if state.token.is_none() {
                    return Err(ApiError::from_response(401, ""));
                }
                Ok(state
                    .carts
                    .entry(CUSTOMER_CART.to_string())
                    .or_insert_with(|| CartSnapshot {
                        cart_id: Some(CUSTOMER_CART.to_string()),
                        ..CartSnapshot::empty()
                    })
                    .clone())
            }
        }
    }

    async fn add_item(&self, request: &AddItemRequest) -> ApiResult<CartSnapshot> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("add {}x{}", request.product_id, request.quantity));
        state.next_id += 1;
        let line_id = state.next_id.to_string();

        let cart_id = match (&request.cart_id, &state.token) {
            (Some(id), _) => id.clone(),
            (None, Some(_)) => CUSTOMER_CART.to_string(),
            (None, None) => format!("guest-{}", line_id),
        };

        let mut item = CartItem::new(
            line_id,
            request.product_id.clone(),
            unit_price(&request.product_id),
            request.quantity,
        );
        for extra in &request.extras {
            item = item.with_extra(Extra::new(extra.ingredient_id.clone(), extra.quantity));
        }
        for modification in &request.base_modifications {
            item = item.with_modification(BaseModification::new(
                modification.ingredient_id.clone(),
                modification.delta,
            ));
        }
        item.notes = request.notes.clone();

        let cart = state
            .carts
            .entry(cart_id.clone())
            .or_insert_with(|| CartSnapshot {
                cart_id: Some(cart_id),
                ..CartSnapshot::empty()
            });
        cart.items.push(item);
        Ok(cart.clone())
    }

    async fn update_item(
        &self,
        cart_id: &str,
        item_id: &str,
        request: &UpdateItemRequest,
    ) -> ApiResult<CartSnapshot> {
        // Give concurrent callers a chance to interleave.
        tokio::task::yield_now().await;

        let mut state = self.state.lock().unwrap();
        state.calls.push(format!(
            "update {} qty={}",
            item_id,
            request.quantity.map(|q| q.to_string()).unwrap_or_default()
        ));
        if state.fail_updates {
            return Err(unavailable());
        }

        let cart = state.carts.get_mut(cart_id).ok_or_else(not_found)?;
        let item = cart
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(not_found)?;
        if let Some(quantity) = request.quantity {
            item.quantity = quantity;
        }
        if let Some(notes) = &request.notes {
            item.notes = Some(notes.clone()).filter(|n| !n.is_empty());
        }
        Ok(cart.clone())
    }

    async fn remove_item(&self, cart_id: &str, item_id: &str) -> ApiResult<CartSnapshot> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("remove {}", item_id));
        let cart = state.carts.get_mut(cart_id).ok_or_else(not_found)?;
        cart.items.retain(|item| item.id != item_id);
        Ok(cart.clone())
    }

    async fn clear_cart(&self, cart_id: &str) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("clear {}", cart_id));
        if state.fail_clear {
            return Err(unavailable());
        }
        if let Some(cart) = state.carts.get_mut(cart_id) {
            cart.items.clear();
        }
        Ok(())
    }

    async fn claim_cart(&self, guest_cart_id: &str) -> ApiResult<CartSnapshot> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("claim {}", guest_cart_id));
        if state.token.is_none() {
            return Err(ApiError::from_response(401, ""));
        }

        let guest = state.carts.remove(guest_cart_id).ok_or_else(not_found)?;
        let cart = state
            .carts
            .entry(CUSTOMER_CART.to_string())
            .or_insert_with(|| CartSnapshot {
                cart_id: Some(CUSTOMER_CART.to_string()),
                ..CartSnapshot::empty()
            });
        cart.items.extend(guest.items);
        let mut claimed = cart.clone();
        if state.claim_without_id {
            claimed.cart_id = None;
        }
        Ok(claimed)
    }

    async fn validate_cart(&self, cart_id: &str) -> ApiResult<ValidationReport> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("validate {}", cart_id));
        if state.stock_short {
            return Err(ApiError::from_response(
                400,
                r#"{"code":"INSUFFICIENT_STOCK","message":"Estoque insuficiente"}"#,
            ));
        }
        Ok(ValidationReport::default())
    }

    async fn fetch_ingredient_prices(&self) -> ApiResult<Vec<IngredientPrice>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("ingredients".to_string());
        if state.fail_reads {
            return Err(unavailable());
        }
        Ok(state.prices.clone())
    }

    async fn set_token(&self, token: Option<String>) {
        self.state.lock().unwrap().token = token;
    }
}

pub async fn local_store() -> LocalStore {
    LocalStore::new(StoreConfig::in_memory()).await.unwrap()
}

pub fn basket(backend: &FakeBackend, local: &LocalStore) -> BasketStore<FakeBackend> {
    BasketStore::new(backend.clone(), local)
}
