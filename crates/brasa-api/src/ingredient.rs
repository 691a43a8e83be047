//! # Ingredient Endpoint
//!
//! `GET /ingredients` feeds the ingredient price cache. The list arrives as a
//! bare array or inside `data` / `ingredients`.

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use brasa_core::types::decode_list;
use brasa_core::IngredientPrice;

use crate::client::ApiClient;
use crate::error::ApiResult;

const LIST_KEYS: &[&str] = &["data", "ingredients", "items"];

/// Extracts the ingredient list from any known envelope.
pub fn parse_ingredient_list(value: &Value) -> Vec<IngredientPrice> {
    let list = match value {
        Value::Array(values) => Some(values),
        Value::Object(record) => brasa_core::wire::array(record, LIST_KEYS),
        _ => None,
    };

    list.map(|values| decode_list::<IngredientPrice>(values))
        .unwrap_or_default()
        .into_iter()
        .filter(|entry| !entry.id.is_empty())
        .collect()
}

impl ApiClient {
    /// `GET /ingredients`
    pub async fn fetch_ingredient_prices(&self) -> ApiResult<Vec<IngredientPrice>> {
        let body = self.send(Method::GET, "/ingredients", None).await?;
        let entries = parse_ingredient_list(&body);
        debug!(count = entries.len(), "Fetched ingredient prices");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brasa_core::Money;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let entries = parse_ingredient_list(&json!([
            {"id": 1, "name": "Bacon", "additional_price": "4,00", "price": 3},
            {"name": "no id"}
        ]));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].additional_price, Some(Money::from_cents(400)));
        assert_eq!(entries[0].price, Some(Money::from_cents(300)));
    }

    #[test]
    fn test_enveloped_lists() {
        assert_eq!(parse_ingredient_list(&json!({"data": [{"id": "a"}]})).len(), 1);
        assert_eq!(parse_ingredient_list(&json!({"ingredients": [{"id": "a"}, {"id": "b"}]})).len(), 2);
        assert!(parse_ingredient_list(&json!({"message": "ok"})).is_empty());
        assert!(parse_ingredient_list(&Value::Null).is_empty());
    }
}
