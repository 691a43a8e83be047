//! # Basket Errors
//!
//! What the screens see. Every lower-level failure ends up here with its
//! [`ErrorKind`] intact, so a screen decides between an alert and a quiet
//! fallback with one call to [`BasketError::is_user_facing`].

use thiserror::Error;

use brasa_api::ApiError;
use brasa_core::{CoreError, ErrorKind, ValidationError};
use brasa_store::StoreError;

/// Errors raised by [`crate::BasketStore`] and [`crate::Session`].
#[derive(Debug, Error)]
pub enum BasketError {
    /// A mutation ran before `init`.
    #[error("Basket is not initialized")]
    NotInitialized,

    /// The operation needs a signed-in customer.
    #[error("Not signed in")]
    NotSignedIn,

    /// Checkout validation was asked for an empty basket.
    #[error("Basket is empty")]
    EmptyBasket,

    /// Local rule violation. Nothing was sent.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// The backend or the network failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local persistence failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<ValidationError> for BasketError {
    fn from(err: ValidationError) -> Self {
        BasketError::Domain(CoreError::Validation(err))
    }
}

impl BasketError {
    /// Shorthand for an unknown line.
    pub fn item_not_found(item_id: impl Into<String>) -> Self {
        BasketError::Domain(CoreError::ItemNotFound(item_id.into()))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BasketError::Api(err) => err.kind(),
            BasketError::Domain(CoreError::ItemNotFound(_)) => ErrorKind::NotFound,
            BasketError::Domain(_) | BasketError::EmptyBasket => ErrorKind::Validation,
            BasketError::NotSignedIn => ErrorKind::Unauthorized,
            BasketError::NotInitialized | BasketError::Storage(_) => ErrorKind::Unknown,
        }
    }

    /// True when the screen should alert instead of degrading quietly.
    pub fn is_user_facing(&self) -> bool {
        self.kind().is_user_facing()
    }
}

pub type BasketResult<T> = Result<T, BasketError>;
