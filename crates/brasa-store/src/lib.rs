//! # brasa-store: Local Session Storage
//!
//! SQLite-backed key/value storage for the values the storefront client
//! keeps between runs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Brasa Client Data Flow                           │
//! │                                                                         │
//! │  BasketStore::init / clear / claim_guest_cart                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    brasa-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │  LocalStore   │    │  SessionRepository │  │ Migrations │  │   │
//! │  │   │  (pool.rs)    │◄───│  guest_cart_id     │  │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │  user_token        │  │ 001_local_ │  │   │
//! │  │   │               │    │  user_data         │  │   state    │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ~/.local/share/brasa/brasa.db                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brasa_store::{LocalStore, StoreConfig};
//!
//! let store = LocalStore::new(StoreConfig::new("brasa.db")).await?;
//! store.session().set_guest_cart_id("c-17").await?;
//! assert_eq!(store.session().guest_cart_id().await?.as_deref(), Some("c-17"));
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use pool::{LocalStore, StoreConfig};
pub use repository::session::SessionRepository;
