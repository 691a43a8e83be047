//! # Repository Module
//!
//! ```text
//! BasketStore / CLI
//!       │  store.session().guest_cart_id()
//!       ▼
//! SessionRepository
//! ├── guest_cart_id / set_guest_cart_id / clear_guest_cart_id
//! ├── user_token / set_user_token
//! ├── user_data / set_user_data
//! └── get / put / delete
//!       │
//!       ▼
//! local_state (key, value, updated_at)
//! ```

pub mod session;
