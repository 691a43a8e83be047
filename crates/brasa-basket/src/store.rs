//! # Basket Store
//!
//! Holds the current cart for the life of the app.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          BasketStore                                    │
//! │                                                                         │
//! │  screen ──► add / update / remove / clear                               │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │          validate locally ──✗──► BasketError::Domain (no request)       │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │          gate.lock()            one mutation at a time, in call order   │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │          CartBackend ──► CartSnapshot ──► state (RwLock)                │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                                  price_cart ──► BasketView ──► watch    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! `state` is never held across a backend call. Mutations hold `gate` for
//! their whole round trip so two quick taps on a quantity stepper reach the
//! backend and the state in the order they were made.
//!
//! ## Failure Policy
//! Reads during `init` degrade to an empty basket with a warning. Mutations
//! surface their error and leave the basket as it was (optimistic updates
//! are rolled back).

use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, warn};

use brasa_api::{
    AddItemRequest, CartBackend, ExtraSelection, ModificationSelection, UpdateItemRequest,
    ValidationReport,
};
use brasa_core::validation::{
    validate_cart_size, validate_extras, validate_id, validate_notes, validate_quantity,
    validate_quantity_update,
};
use brasa_core::{
    BaseModification, CartSnapshot, CoreError, Extra, IngredientPriceCache, MAX_CART_ITEMS,
};
use brasa_store::{LocalStore, SessionRepository};

use crate::error::{BasketError, BasketResult};
use crate::view::BasketView;

// =============================================================================
// Inputs
// =============================================================================

/// A new line for the basket.
#[derive(Debug, Clone, Default)]
pub struct AddItem {
    pub product_id: String,
    pub quantity: i64,
    pub extras: Vec<Extra>,
    pub base_modifications: Vec<BaseModification>,
    pub notes: Option<String>,
}

impl AddItem {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        AddItem {
            product_id: product_id.into(),
            quantity,
            ..Default::default()
        }
    }

    pub fn with_extra(mut self, ingredient_id: impl Into<String>, quantity: i64) -> Self {
        self.extras.push(Extra::new(ingredient_id, quantity));
        self
    }

    pub fn with_modification(mut self, ingredient_id: impl Into<String>, delta: i64) -> Self {
        self.base_modifications
            .push(BaseModification::new(ingredient_id, delta));
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Changes to an existing line. `None` leaves the field alone.
///
/// A quantity of zero removes the line. Empty notes clear them.
#[derive(Debug, Clone, Default)]
pub struct UpdateItem {
    pub quantity: Option<i64>,
    pub extras: Option<Vec<Extra>>,
    pub notes: Option<String>,
}

impl UpdateItem {
    pub fn quantity(quantity: i64) -> Self {
        UpdateItem {
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    pub fn notes(notes: impl Into<String>) -> Self {
        UpdateItem {
            notes: Some(notes.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Show the new quantity before the backend confirms it.
    pub optimistic: bool,
}

impl UpdateOptions {
    pub fn optimistic() -> Self {
        UpdateOptions { optimistic: true }
    }
}

fn extra_selections(extras: &[Extra]) -> Vec<ExtraSelection> {
    extras
        .iter()
        .map(|extra| ExtraSelection {
            ingredient_id: extra.ingredient_id.clone(),
            quantity: extra.quantity,
        })
        .collect()
}

fn modification_selections(modifications: &[BaseModification]) -> Vec<ModificationSelection> {
    modifications
        .iter()
        .map(|modification| ModificationSelection {
            ingredient_id: modification.ingredient_id.clone(),
            delta: modification.delta,
        })
        .collect()
}

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Default)]
struct BasketState {
    snapshot: CartSnapshot,
    cache: IngredientPriceCache,
    initialized: bool,
    signed_in: bool,
}

impl BasketState {
    fn view(&self) -> BasketView {
        BasketView::price(&self.snapshot, &self.cache, self.initialized, self.signed_in)
    }
}

// =============================================================================
// Basket Store
// =============================================================================

/// The basket state holder.
///
/// ```rust,ignore
/// let basket = BasketStore::new(client, &local);
/// basket.init().await?;
/// basket.add_to_basket(AddItem::new("10", 1).with_extra("3", 2)).await?;
/// ```
pub struct BasketStore<B: CartBackend> {
    backend: B,
    session: SessionRepository,
    state: RwLock<BasketState>,
    gate: Mutex<()>,
    updates: watch::Sender<BasketView>,
}

impl<B: CartBackend> BasketStore<B> {
    pub fn new(backend: B, local: &LocalStore) -> Self {
        let (updates, _) = watch::channel(BasketView::blank());
        BasketStore {
            backend,
            session: local.session(),
            state: RwLock::new(BasketState::default()),
            gate: Mutex::new(()),
            updates,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub(crate) fn session(&self) -> &SessionRepository {
        &self.session
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Restores the session, loads ingredient prices and the current cart.
    ///
    /// A signed-in customer gets their own cart; a guest gets the cart whose
    /// id was persisted by an earlier add. Backend failures leave an empty
    /// basket; only local storage failures are returned.
    pub async fn init(&self) -> BasketResult<BasketView> {
        let _gate = self.gate.lock().await;

        let token = self.session.user_token().await?;
        let signed_in = token.is_some();
        self.backend.set_token(token).await;

        let cache = self.load_prices().await;
        let snapshot = self.load_cart(signed_in).await?;

        let view = {
            let mut state = self.state.write().await;
            *state = BasketState {
                snapshot,
                cache,
                initialized: true,
                signed_in,
            };
            state.view()
        };

        info!(
            signed_in,
            lines = view.lines.len(),
            total = %view.total(),
            "Basket initialized"
        );
        Ok(self.publish(view))
    }

    /// Forgets the customer: credentials, stored session, cart and prices.
    pub async fn teardown(&self) -> BasketResult<()> {
        let _gate = self.gate.lock().await;

        self.backend.set_token(None).await;
        self.session.clear_session().await?;
        self.session.clear_guest_cart_id().await?;

        let view = {
            let mut state = self.state.write().await;
            *state = BasketState::default();
            state.view()
        };
        self.publish(view);

        info!("Basket torn down");
        Ok(())
    }

    async fn load_prices(&self) -> IngredientPriceCache {
        match self.backend.fetch_ingredient_prices().await {
            Ok(entries) => IngredientPriceCache::from_entries(entries),
            Err(err) => {
                warn!(error = %err, "Failed to load ingredient prices; extras fall back to line prices");
                IngredientPriceCache::new()
            }
        }
    }

    async fn load_cart(&self, signed_in: bool) -> BasketResult<CartSnapshot> {
        if signed_in {
            return Ok(match self.backend.fetch_cart(None).await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!(error = %err, "Failed to load customer cart; starting empty");
                    CartSnapshot::empty()
                }
            });
        }

        let Some(guest_cart_id) = self.session.guest_cart_id().await? else {
            return Ok(CartSnapshot::empty());
        };

        match self.backend.fetch_cart(Some(&guest_cart_id)).await {
            Ok(snapshot) => Ok(snapshot),
            Err(err) if err.is_not_found() => {
                warn!(cart_id = %guest_cart_id, "Stored guest cart no longer exists");
                self.session.clear_guest_cart_id().await?;
                Ok(CartSnapshot::empty())
            }
            Err(err) => {
                warn!(error = %err, cart_id = %guest_cart_id, "Failed to load guest cart; starting empty");
                // Keep the id so the next add lands in the same cart.
                Ok(CartSnapshot {
                    cart_id: Some(guest_cart_id),
                    ..CartSnapshot::empty()
                })
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a product line.
    ///
    /// The first add of a guest creates the cart on the backend; its id is
    /// persisted so the basket survives a restart.
    pub async fn add_to_basket(&self, item: AddItem) -> BasketResult<BasketView> {
        let product_id = validate_id("product_id", &item.product_id)?;
        validate_quantity(item.quantity)?;
        validate_extras(&item.extras)?;
        for modification in &item.base_modifications {
            validate_id("ingredient_id", &modification.ingredient_id)?;
        }
        let notes = validate_notes(item.notes.as_deref())?;

        let _gate = self.gate.lock().await;
        let (cart_id, line_count, signed_in) = self
            .read_ready(|s| (s.snapshot.cart_id.clone(), s.snapshot.items.len(), s.signed_in))
            .await?;
        validate_cart_size(line_count).map_err(|_| CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        })?;

        let request = AddItemRequest {
            cart_id: if signed_in { None } else { cart_id.clone() },
            product_id,
            quantity: item.quantity,
            extras: extra_selections(&item.extras),
            base_modifications: modification_selections(&item.base_modifications),
            notes,
        };
        let snapshot = self.backend.add_item(&request).await?;

        if !signed_in {
            if let Some(new_id) = snapshot.cart_id.as_deref() {
                if cart_id.as_deref() != Some(new_id) {
                    self.session.set_guest_cart_id(new_id).await?;
                    info!(cart_id = %new_id, "Guest cart created");
                }
            }
        }

        debug!(product_id = %request.product_id, quantity = request.quantity, "Added to basket");
        Ok(self.apply(snapshot).await)
    }

    /// Changes a line. A quantity of zero removes it.
    ///
    /// With [`UpdateOptions::optimistic`] the new quantity and notes are
    /// published before the backend answers, and restored if it fails.
    pub async fn update_basket_item(
        &self,
        item_id: &str,
        update: UpdateItem,
        options: UpdateOptions,
    ) -> BasketResult<BasketView> {
        let item_id = validate_id("item_id", item_id)?;
        if let Some(quantity) = update.quantity {
            validate_quantity_update(quantity)?;
        }
        if let Some(extras) = &update.extras {
            validate_extras(extras)?;
        }
        let notes = match update.notes.as_deref() {
            Some(notes) => Some(validate_notes(Some(notes))?.unwrap_or_default()),
            None => None,
        };

        let _gate = self.gate.lock().await;

        if update.quantity == Some(0) {
            return self.remove_locked(&item_id).await;
        }

        let previous = self.read_ready(|s| s.snapshot.clone()).await?;
        let cart_id = match (&previous.cart_id, previous.find_item(&item_id)) {
            (Some(cart_id), Some(_)) => cart_id.clone(),
            _ => return Err(BasketError::item_not_found(item_id)),
        };

        if options.optimistic {
            let view = {
                let mut state = self.state.write().await;
                let snapshot = &mut state.snapshot;
                if let Some(line) = snapshot.items.iter_mut().find(|i| i.id == item_id) {
                    if let Some(quantity) = update.quantity {
                        line.quantity = quantity;
                        // The server figures describe the old quantity.
                        line.api_subtotal = None;
                        snapshot.summary_total = None;
                    }
                    if let Some(notes) = &notes {
                        line.notes = Some(notes.clone()).filter(|n| !n.is_empty());
                    }
                }
                state.view()
            };
            self.publish(view);
        }

        let request = UpdateItemRequest {
            quantity: update.quantity,
            extras: update.extras.as_deref().map(extra_selections),
            notes,
        };

        match self.backend.update_item(&cart_id, &item_id, &request).await {
            Ok(snapshot) => Ok(self.apply(snapshot).await),
            Err(err) => {
                if options.optimistic {
                    warn!(error = %err, item_id = %item_id, "Update failed; rolling back");
                    self.restore(previous).await;
                }
                Err(err.into())
            }
        }
    }

    pub async fn remove_from_basket(&self, item_id: &str) -> BasketResult<BasketView> {
        let item_id = validate_id("item_id", item_id)?;
        let _gate = self.gate.lock().await;
        self.remove_locked(&item_id).await
    }

    async fn remove_locked(&self, item_id: &str) -> BasketResult<BasketView> {
        let cart_id = self
            .read_ready(|s| {
                s.snapshot
                    .find_item(item_id)
                    .and(s.snapshot.cart_id.clone())
            })
            .await?
            .ok_or_else(|| BasketError::item_not_found(item_id))?;

        let snapshot = self.backend.remove_item(&cart_id, item_id).await?;
        debug!(item_id = %item_id, "Removed from basket");
        Ok(self.apply(snapshot).await)
    }

    /// Empties the basket.
    ///
    /// The backend call is best effort: the local basket and the stored guest
    /// cart id are cleared even when it fails.
    pub async fn clear_basket(&self) -> BasketResult<BasketView> {
        let _gate = self.gate.lock().await;
        let cart_id = self.read_ready(|s| s.snapshot.cart_id.clone()).await?;

        if let Some(cart_id) = cart_id.as_deref() {
            if let Err(err) = self.backend.clear_cart(cart_id).await {
                warn!(error = %err, cart_id = %cart_id, "Failed to clear cart on backend; clearing locally");
            }
        }

        let view = self.install(CartSnapshot::empty(), false).await;
        self.session.clear_guest_cart_id().await?;
        info!("Basket cleared");
        Ok(view)
    }

    // =========================================================================
    // Server Round Trips
    // =========================================================================

    /// Re-fetches the cart and re-prices it.
    pub async fn refresh(&self) -> BasketResult<BasketView> {
        let _gate = self.gate.lock().await;
        let (cart_id, signed_in) = self
            .read_ready(|s| (s.snapshot.cart_id.clone(), s.signed_in))
            .await?;

        let snapshot = match (signed_in, cart_id) {
            (true, _) => self.backend.fetch_cart(None).await?,
            (false, Some(cart_id)) => self.backend.fetch_cart(Some(&cart_id)).await?,
            (false, None) => return Ok(self.snapshot().await),
        };
        Ok(self.apply(snapshot).await)
    }

    /// Moves the stored guest cart to the signed-in customer.
    ///
    /// Without a stored guest cart this just loads the customer's own cart.
    pub async fn claim_guest_cart(&self) -> BasketResult<BasketView> {
        let _gate = self.gate.lock().await;
        if !self.read_ready(|s| s.signed_in).await? {
            return Err(BasketError::NotSignedIn);
        }

        let snapshot = match self.session.guest_cart_id().await? {
            Some(guest_cart_id) => match self.backend.claim_cart(&guest_cart_id).await {
                Ok(snapshot) => {
                    info!(guest_cart_id = %guest_cart_id, "Guest cart claimed");
                    self.session.clear_guest_cart_id().await?;
                    if snapshot.cart_id.is_some() {
                        snapshot
                    } else {
                        debug!("Claim response carried no cart id; loading customer cart");
                        self.backend.fetch_cart(None).await?
                    }
                }
                Err(err) if err.is_not_found() => {
                    warn!(guest_cart_id = %guest_cart_id, "Guest cart vanished before claim");
                    self.session.clear_guest_cart_id().await?;
                    self.backend.fetch_cart(None).await?
                }
                Err(err) => return Err(err.into()),
            },
            None => self.backend.fetch_cart(None).await?,
        };

        // The guest id is gone after a claim and must not be inherited.
        Ok(self.install(snapshot, false).await)
    }

    /// Asks the backend whether the basket can go to checkout.
    ///
    /// Issues come back in the report; a stock shortage may also arrive as
    /// an error of kind `InsufficientStock`.
    pub async fn validate_for_checkout(&self) -> BasketResult<ValidationReport> {
        let _gate = self.gate.lock().await;
        let cart_id = self
            .read_ready(|s| s.snapshot.cart_id.clone().filter(|_| !s.snapshot.is_empty()))
            .await?
            .ok_or(BasketError::EmptyBasket)?;

        let report = self.backend.validate_cart(&cart_id).await?;
        if !report.is_valid() {
            warn!(issues = report.issues.len(), "Checkout validation reported issues");
        }
        Ok(report)
    }

    /// Reloads the ingredient price cache and re-prices the basket.
    pub async fn reload_prices(&self) -> BasketResult<BasketView> {
        let entries = self.backend.fetch_ingredient_prices().await?;
        let view = {
            let mut state = self.state.write().await;
            state.cache = IngredientPriceCache::from_entries(entries);
            state.view()
        };
        debug!(count = view.lines.len(), "Basket re-priced");
        Ok(self.publish(view))
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Current view of the basket.
    pub async fn snapshot(&self) -> BasketView {
        self.state.read().await.view()
    }

    /// Receives a new view after every change.
    pub fn subscribe(&self) -> watch::Receiver<BasketView> {
        self.updates.subscribe()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    pub(crate) async fn mark_signed_in(&self, signed_in: bool) {
        self.state.write().await.signed_in = signed_in;
    }

    pub(crate) async fn is_initialized(&self) -> bool {
        self.state.read().await.initialized
    }

    async fn read_ready<T>(&self, f: impl FnOnce(&BasketState) -> T) -> BasketResult<T> {
        let state = self.state.read().await;
        if !state.initialized {
            return Err(BasketError::NotInitialized);
        }
        Ok(f(&state))
    }

    /// Installs a backend snapshot. A snapshot without an id keeps the
    /// current one.
    async fn apply(&self, snapshot: CartSnapshot) -> BasketView {
        self.install(snapshot, true).await
    }

    async fn restore(&self, previous: CartSnapshot) {
        self.install(previous, false).await;
    }

    async fn install(&self, mut snapshot: CartSnapshot, keep_cart_id: bool) -> BasketView {
        let view = {
            let mut state = self.state.write().await;
            if keep_cart_id && snapshot.cart_id.is_none() {
                snapshot.cart_id = state.snapshot.cart_id.take();
            }
            state.snapshot = snapshot;
            state.view()
        };
        self.publish(view)
    }

    fn publish(&self, view: BasketView) -> BasketView {
        self.updates.send_replace(view.clone());
        view
    }
}
