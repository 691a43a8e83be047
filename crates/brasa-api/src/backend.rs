//! # Cart Backend Trait
//!
//! The seam between the basket state holder and the network. [`ApiClient`]
//! is the production implementation; tests supply an in-memory one.
//!
//! ```text
//! BasketStore<B: CartBackend>
//!       │
//!       ├── ApiClient          (HTTP, this crate)
//!       └── FakeBackend        (tests)
//! ```

use async_trait::async_trait;

use brasa_core::{CartSnapshot, IngredientPrice};

use crate::cart::{AddItemRequest, UpdateItemRequest, ValidationReport};
use crate::client::ApiClient;
use crate::error::ApiResult;

/// Cart operations the basket needs from the backend.
#[async_trait]
pub trait CartBackend: Send + Sync {
    /// Fetches a cart by id, or the signed-in customer's cart when `None`.
    async fn fetch_cart(&self, cart_id: Option<&str>) -> ApiResult<CartSnapshot>;

    async fn add_item(&self, request: &AddItemRequest) -> ApiResult<CartSnapshot>;

    async fn update_item(
        &self,
        cart_id: &str,
        item_id: &str,
        request: &UpdateItemRequest,
    ) -> ApiResult<CartSnapshot>;

    async fn remove_item(&self, cart_id: &str, item_id: &str) -> ApiResult<CartSnapshot>;

    async fn clear_cart(&self, cart_id: &str) -> ApiResult<()>;

    async fn claim_cart(&self, guest_cart_id: &str) -> ApiResult<CartSnapshot>;

    async fn validate_cart(&self, cart_id: &str) -> ApiResult<ValidationReport>;

    async fn fetch_ingredient_prices(&self) -> ApiResult<Vec<IngredientPrice>>;

    /// Sets or clears the credentials used for later calls.
    async fn set_token(&self, token: Option<String>);
}

#[async_trait]
impl CartBackend for ApiClient {
    async fn fetch_cart(&self, cart_id: Option<&str>) -> ApiResult<CartSnapshot> {
        match cart_id {
            Some(id) => ApiClient::fetch_cart(self, id).await,
            None => self.fetch_my_cart().await,
        }
    }

    async fn add_item(&self, request: &AddItemRequest) -> ApiResult<CartSnapshot> {
        ApiClient::add_item(self, request).await
    }

    async fn update_item(
        &self,
        cart_id: &str,
        item_id: &str,
        request: &UpdateItemRequest,
    ) -> ApiResult<CartSnapshot> {
        ApiClient::update_item(self, cart_id, item_id, request).await
    }

    async fn remove_item(&self, cart_id: &str, item_id: &str) -> ApiResult<CartSnapshot> {
        ApiClient::remove_item(self, cart_id, item_id).await
    }

    async fn clear_cart(&self, cart_id: &str) -> ApiResult<()> {
        ApiClient::clear_cart(self, cart_id).await
    }

    async fn claim_cart(&self, guest_cart_id: &str) -> ApiResult<CartSnapshot> {
        ApiClient::claim_cart(self, guest_cart_id).await
    }

    async fn validate_cart(&self, cart_id: &str) -> ApiResult<ValidationReport> {
        ApiClient::validate_cart(self, cart_id).await
    }

    async fn fetch_ingredient_prices(&self) -> ApiResult<Vec<IngredientPrice>> {
        ApiClient::fetch_ingredient_prices(self).await
    }

    async fn set_token(&self, token: Option<String>) {
        ApiClient::set_token(self, token).await
    }
}
