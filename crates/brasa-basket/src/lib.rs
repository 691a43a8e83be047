//! # brasa-basket: Basket State Holder
//!
//! Owns the customer's basket for the life of the app: loads it at start,
//! applies mutations in order, prices every change and publishes a
//! [`BasketView`] to whoever is watching.
//!
//! ## Module Structure
//! ```text
//! brasa_basket
//! ├── store      BasketStore<B: CartBackend>: lifecycle and mutations
//! ├── session    Session: login (claims the guest cart) / logout
//! ├── view       BasketView: priced lines + totals for screens
//! └── error      BasketError with the backend ErrorKind carried through
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use std::sync::Arc;
//! use brasa_basket::{AddItem, BasketStore, Session};
//!
//! let basket = Arc::new(BasketStore::new(client, &local));
//! basket.init().await?;
//!
//! let view = basket.add_to_basket(AddItem::new("10", 2).with_extra("3", 1)).await?;
//! println!("{}", view.total());
//!
//! Session::new(basket.clone()).login(&token, &profile).await?;
//! ```

pub mod error;
pub mod session;
pub mod store;
pub mod view;

pub use error::{BasketError, BasketResult};
pub use session::Session;
pub use store::{AddItem, BasketStore, UpdateItem, UpdateOptions};
pub use view::BasketView;
