use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::{
    dto::coerce,
    error::{AppError, AppResult},
    models::ProductFields,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// One of `get_all`, `get`, `create`, `update`, `delete`.
    pub action: Option<String>,
    /// Product id, used by `get`.
    pub id: Option<String>,
}

/// Raw product body as sent by clients. Every field is optional and loosely
/// typed; [`ProductPayload::into_create`] and friends turn it into typed input.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductPayload {
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub id: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub category: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub stock: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Value>,
}

impl ProductPayload {
    /// Sanitized and coerced fields. Missing strings become empty, missing or
    /// unreadable numbers become zero, negative stock becomes zero.
    pub fn fields(&self) -> ProductFields {
        let stock = coerce::integer(self.stock.as_ref()).clamp(0, i64::from(i32::MAX));
        ProductFields {
            name: coerce::sanitize(&coerce::string(self.name.as_ref())),
            description: coerce::sanitize(&coerce::string(self.description.as_ref())),
            price: coerce::decimal(self.price.as_ref()).round_dp(2),
            category: coerce::sanitize(&coerce::string(self.category.as_ref())),
            stock: stock as i32,
            image_url: coerce::sanitize(&coerce::string(self.image_url.as_ref())),
        }
    }

    pub fn into_create(self) -> AppResult<ProductFields> {
        let fields = self.fields();
        if !self.has_name_and_price(&fields) {
            return Err(AppError::Validation("Name and price are required".into()));
        }
        Ok(fields)
    }

    pub fn into_update(self) -> AppResult<ProductUpdate> {
        let id = coerce::integer(self.id.as_ref());
        let fields = self.fields();
        if id <= 0 || !self.has_name_and_price(&fields) {
            return Err(AppError::Validation(
                "ID, name, and price are required".into(),
            ));
        }
        Ok(ProductUpdate { id, fields })
    }

    pub fn into_delete(self) -> AppResult<i64> {
        positive_id(coerce::integer(self.id.as_ref()))
    }

    /// The sign is checked on the price as sent, before rounding, so
    /// `-0.004` is rejected rather than stored as `0.00`.
    fn has_name_and_price(&self, fields: &ProductFields) -> bool {
        !fields.name.is_empty() && coerce::decimal(self.price.as_ref()) >= Decimal::ZERO
    }
}

fn positive_id(id: i64) -> AppResult<i64> {
    if id <= 0 {
        return Err(AppError::Validation("Product ID is required".into()));
    }
    Ok(id)
}

impl ProductQuery {
    /// The `id` query parameter of `get`, which must be a positive integer.
    pub fn product_id(&self) -> AppResult<i64> {
        let id = self
            .id
            .as_deref()
            .map(str::trim)
            .and_then(|raw| raw.parse::<i64>().ok())
            .unwrap_or(0);
        positive_id(id)
    }
}

/// Full replacement of one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub id: i64,
    pub fields: ProductFields,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductCreated {
    pub success: bool,
    pub message: String,
    pub product_id: i64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(value: Value) -> ProductPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn create_requires_name() {
        let err = payload(json!({ "price": 10 })).into_create().unwrap_err();
        assert_eq!(err.to_string(), "Name and price are required");
    }

    #[test]
    fn create_rejects_negative_price() {
        let err = payload(json!({ "name": "Doom", "price": -0.01 }))
            .into_create()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn sub_cent_negative_price_is_not_rounded_away() {
        assert!(payload(json!({ "name": "Doom", "price": -0.004 })).into_create().is_err());
        assert!(payload(json!({ "id": 1, "name": "Doom", "price": "-0.001" }))
            .into_update()
            .is_err());
    }

    #[test]
    fn whitespace_name_is_empty_after_sanitizing() {
        assert!(payload(json!({ "name": "   ", "price": 1 })).into_create().is_err());
    }

    #[test]
    fn omitted_fields_become_empty_or_zero() {
        let fields = payload(json!({ "name": "Doom" })).into_create().unwrap();
        assert_eq!(
            fields,
            ProductFields {
                name: "Doom".into(),
                description: String::new(),
                price: Decimal::ZERO,
                category: String::new(),
                stock: 0,
                image_url: String::new(),
            }
        );
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let fields = payload(json!({ "name": "Doom", "price": "19.999", "stock": "7" }))
            .into_create()
            .unwrap();
        assert_eq!(fields.price, Decimal::new(2000, 2));
        assert_eq!(fields.stock, 7);
    }

    #[test]
    fn negative_stock_is_clamped() {
        let fields = payload(json!({ "name": "Doom", "price": 1, "stock": -4 }))
            .into_create()
            .unwrap();
        assert_eq!(fields.stock, 0);
    }

    #[test]
    fn update_requires_positive_id() {
        let err = payload(json!({ "name": "Doom", "price": 1 }))
            .into_update()
            .unwrap_err();
        assert_eq!(err.to_string(), "ID, name, and price are required");

        let update = payload(json!({ "id": "3", "name": "Doom", "price": 1 }))
            .into_update()
            .unwrap();
        assert_eq!(update.id, 3);
    }

    #[test]
    fn delete_requires_positive_id() {
        assert!(payload(json!({})).into_delete().is_err());
        assert!(payload(json!({ "id": -1 })).into_delete().is_err());
        assert_eq!(payload(json!({ "id": 9 })).into_delete().unwrap(), 9);
    }

    #[test]
    fn query_id_must_be_positive_integer() {
        let query = |id: Option<&str>| ProductQuery {
            action: Some("get".into()),
            id: id.map(Into::into),
        };
        assert_eq!(query(Some("12")).product_id().unwrap(), 12);
        assert!(query(None).product_id().is_err());
        assert!(query(Some("abc")).product_id().is_err());
        assert!(query(Some("0")).product_id().is_err());
    }
}
