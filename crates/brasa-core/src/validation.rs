//! # Validation Module
//!
//! Input checks run before a cart mutation leaves the device.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  └── Types: quantity is an integer, ids are present                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: BasketStore                                                  │
//! │  └── THIS MODULE: quantity range, notes length, cart size              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storefront backend                                           │
//! │  └── Stock, permissions, authoritative validation                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use brasa_core::validation::{validate_notes, validate_quantity};
//!
//! validate_quantity(2).unwrap();
//! validate_notes(Some("sem cebola")).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::Extra;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_NOTES_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates an identifier received from the user or the backend.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 64 characters
/// - No whitespace inside
///
/// ## Returns
/// The trimmed id.
///
/// ```rust
/// use brasa_core::validation::validate_id;
///
/// assert_eq!(validate_id("product_id", " 42 ").unwrap(), "42");
/// assert!(validate_id("product_id", "").is_err());
/// assert!(validate_id("product_id", "4 2").is_err());
/// ```
pub fn validate_id(field: &str, id: &str) -> ValidationResult<String> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 64,
        });
    }

    if id.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(id.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the quantity of a new line.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (99)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a quantity update. Zero is allowed and means "remove the line".
pub fn validate_quantity_update(qty: i64) -> ValidationResult<()> {
    if qty == 0 {
        return Ok(());
    }
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_ITEM_QUANTITY,
        });
    }
    validate_quantity(qty)
}

// =============================================================================
// Line Content Validators
// =============================================================================

/// Validates the free-text notes of a line.
///
/// Returns the trimmed notes, or `None` when they are blank.
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }

    Ok(Some(notes.to_string()))
}

/// Validates the extras of a new line: every extra needs an ingredient id
/// and a quantity in `1..=MAX_ITEM_QUANTITY`.
pub fn validate_extras(extras: &[Extra]) -> ValidationResult<()> {
    for extra in extras {
        validate_id("ingredient_id", &extra.ingredient_id)?;
        if extra.quantity <= 0 || extra.quantity > MAX_ITEM_QUANTITY {
            return Err(ValidationError::OutOfRange {
                field: format!("extra {} quantity", extra.ingredient_id),
                min: 1,
                max: MAX_ITEM_QUANTITY,
            });
        }
    }
    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more line fits in the cart.
///
/// ## Rules
/// - Must not exceed MAX_CART_ITEMS (50)
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id("id", "abc-1").unwrap(), "abc-1");
        assert!(validate_id("id", "   ").is_err());
        assert!(validate_id("id", &"9".repeat(65)).is_err());
        assert!(validate_id("id", "a b").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(99).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(100).is_err());
    }

    #[test]
    fn test_validate_quantity_update_allows_zero() {
        assert!(validate_quantity_update(0).is_ok());
        assert!(validate_quantity_update(5).is_ok());
        assert!(validate_quantity_update(-1).is_err());
        assert!(validate_quantity_update(100).is_err());
    }

    #[test]
    fn test_validate_notes() {
        assert_eq!(validate_notes(None).unwrap(), None);
        assert_eq!(validate_notes(Some("   ")).unwrap(), None);
        assert_eq!(
            validate_notes(Some(" bem passado ")).unwrap().as_deref(),
            Some("bem passado")
        );
        assert!(validate_notes(Some(&"ã".repeat(140))).is_ok());
        assert!(validate_notes(Some(&"a".repeat(141))).is_err());
    }

    #[test]
    fn test_validate_extras() {
        assert!(validate_extras(&[Extra::new("7", 1), Extra::new("8", 3)]).is_ok());
        assert!(validate_extras(&[Extra::new("", 1)]).is_err());
        assert!(validate_extras(&[Extra::new("7", 0)]).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(49).is_ok());
        assert!(validate_cart_size(50).is_err());
    }
}
