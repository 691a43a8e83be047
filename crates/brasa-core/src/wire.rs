//! # Wire Helpers
//!
//! Lenient field extraction for backend JSON records.
//!
//! The storefront backend is not consistent about field names or value types:
//! the same id arrives as `17` or `"17"`, the same quantity as `2` or `"2"`,
//! and a price may live under any of several names. These helpers implement
//! "first present key wins" lookups so every decoder shares one set of rules.
//!
//! ```text
//! { "ingredientId": 17, "qty": "2", "unitPrice": "3,50" }
//!         │               │              │
//!         ▼               ▼              ▼
//!  id(..) → "17"    int(..) → 2    amount(..) → Some(R$ 3,50)
//! ```

use serde_json::{Map, Value};

use crate::money::Money;

/// A loosely-typed backend record.
pub type Record = Map<String, Value>;

/// Returns the first key whose value is present and not `null`.
pub fn first_present<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

/// Reads an identifier as a string. Numbers are stringified, strings trimmed.
///
/// ```rust
/// use brasa_core::wire::{id, Record};
/// use serde_json::json;
///
/// let record: Record = serde_json::from_value(json!({"productId": 42})).unwrap();
/// assert_eq!(id(&record, &["product_id", "productId"]), Some("42".to_string()));
/// ```
pub fn id(record: &Record, keys: &[&str]) -> Option<String> {
    first_present(record, keys).and_then(value_to_id)
}

/// Converts a single JSON value into an identifier.
pub fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads an integer. Numeric strings are accepted; fractional values truncate.
///
/// Returns `None` when no key is present, `Some(0)` when the chosen value
/// cannot be read as a number.
pub fn int(record: &Record, keys: &[&str]) -> Option<i64> {
    first_present(record, keys).map(|value| value_to_int(value).unwrap_or(0))
}

fn value_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                trimmed
                    .replace(',', ".")
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}

/// Reads a monetary amount from the first present key.
///
/// Returns `None` when no key is present. A present value that cannot be
/// parsed yields `Some(Money::zero())`: the value was chosen, it is NaN, and
/// NaN counts as zero.
pub fn amount(record: &Record, keys: &[&str]) -> Option<Money> {
    first_present(record, keys).map(|value| Money::from_wire(value).unwrap_or_default())
}

/// Reads a non-empty string.
pub fn text(record: &Record, keys: &[&str]) -> Option<String> {
    first_present(record, keys)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Returns a nested object by key.
pub fn object<'a>(record: &'a Record, key: &str) -> Option<&'a Record> {
    record.get(key).and_then(Value::as_object)
}

/// Returns the first present array among `keys`.
pub fn array<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(Value::as_array)
}
