//! # brasa-api: Storefront Backend REST Client
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BasketStore<B: CartBackend>                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    brasa-api (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   backend.rs     CartBackend trait, impl for ApiClient          │   │
//! │  │   cart.rs        cart endpoints + normalize_cart                │   │
//! │  │   ingredient.rs  GET /ingredients                               │   │
//! │  │   client.rs      reqwest, token, x-request-id                   │   │
//! │  │   config.rs      ClientConfig (file / env / defaults)           │   │
//! │  │   error.rs       ApiError (classified with ErrorKind)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Storefront backend (JSON over HTTPS)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use brasa_api::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::new(&ClientConfig::new("https://api.brasa.example/api"))?;
//! let cart = client.fetch_cart("17").await?;
//! ```

pub mod backend;
pub mod cart;
pub mod client;
pub mod config;
pub mod error;
pub mod ingredient;

pub use backend::CartBackend;
pub use cart::{
    normalize_cart, AddItemRequest, ExtraSelection, ModificationSelection, UpdateItemRequest,
    ValidationIssue, ValidationReport,
};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
