//! # Customer Session
//!
//! Sign-in and sign-out on top of the basket. Signing in stores the
//! credentials locally, hands the token to the backend and claims any guest
//! cart the customer built before signing in.
//!
//! ```text
//! login(token, user)                      logout()
//!   │                                       │
//!   ├── store token + user data             └── BasketStore::teardown
//!   ├── backend.set_token                         (token, session, cart, prices)
//!   ├── init basket (first time)
//!   └── claim_guest_cart ──✗──► warn, keep customer's cart
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use brasa_api::CartBackend;
use brasa_core::ValidationError;

use crate::error::BasketResult;
use crate::store::BasketStore;
use crate::view::BasketView;

/// Sign-in state bound to one basket.
pub struct Session<B: CartBackend> {
    basket: Arc<BasketStore<B>>,
}

impl<B: CartBackend> Session<B> {
    pub fn new(basket: Arc<BasketStore<B>>) -> Self {
        Session { basket }
    }

    pub fn basket(&self) -> &BasketStore<B> {
        &self.basket
    }

    /// Signs the customer in and merges their guest cart.
    ///
    /// A failed claim does not undo the sign-in; the returned view then shows
    /// whatever the basket held before.
    pub async fn login<T: Serialize>(&self, token: &str, user_data: &T) -> BasketResult<BasketView> {
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(ValidationError::Required {
                field: "token".to_string(),
            }
            .into());
        }

        let store = self.basket.session();
        store.set_user_token(&token).await?;
        store.set_user_data(user_data).await?;
        self.basket.backend().set_token(Some(token)).await;

        if self.basket.is_initialized().await {
            self.basket.mark_signed_in(true).await;
        } else {
            // init picks the stored token up and marks the basket signed in.
            self.basket.init().await?;
        }

        info!("Customer signed in");
        match self.basket.claim_guest_cart().await {
            Ok(view) => Ok(view),
            Err(err) => {
                warn!(error = %err, "Failed to claim guest cart");
                Ok(self.basket.snapshot().await)
            }
        }
    }

    /// Signs the customer out and forgets the basket.
    pub async fn logout(&self) -> BasketResult<()> {
        self.basket.teardown().await?;
        info!("Customer signed out");
        Ok(())
    }

    pub async fn is_signed_in(&self) -> BasketResult<bool> {
        Ok(self.basket.session().user_token().await?.is_some())
    }

    /// The stored profile of the signed-in customer.
    pub async fn current_user<T: DeserializeOwned>(&self) -> BasketResult<Option<T>> {
        Ok(self.basket.session().user_data().await?)
    }
}
