//! Field-by-field checks for request bodies.
//!
//! Bodies arrive as loose JSON so that every problem can be reported at once
//! with the name of the offending field, instead of stopping at the first
//! serde error.

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::clients::RequestedLine;
use crate::domain::{OrderPatch, OrderStatus, Shipping};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

fn as_object<'a>(body: &'a Value, errors: &mut ValidationErrors) -> Option<&'a Map<String, Value>> {
    let object = body.as_object();
    if object.is_none() {
        errors.push("body", "request body must be a JSON object");
    }
    object
}

fn required_text(object: &Map<String, Value>, field: &str, errors: &mut ValidationErrors) -> String {
    match object.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::String(_)) => {
            errors.push(field, format!("{field} must not be empty"));
            String::new()
        }
        None | Some(Value::Null) => {
            errors.push(field, format!("{field} is required"));
            String::new()
        }
        Some(_) => {
            errors.push(field, format!("{field} must be a string"));
            String::new()
        }
    }
}

fn optional_text(object: &Map<String, Value>, field: &str, errors: &mut ValidationErrors) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::String(_)) => {
            errors.push(field, format!("{field} must not be empty"));
            None
        }
        Some(_) => {
            errors.push(field, format!("{field} must be a string"));
            None
        }
    }
}

fn cart_line(index: usize, entry: &Value, errors: &mut ValidationErrors) -> Option<RequestedLine> {
    let Some(entry) = entry.as_object() else {
        errors.push(format!("products[{index}]"), "each product must be an object");
        return None;
    };

    // A non-string id is kept verbatim; checkout treats it as an unusable line.
    let product_id = match entry.get("productId") {
        None | Some(Value::Null) => {
            errors.push(format!("products[{index}].productId"), "productId is required");
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    let field = format!("products[{index}].quantity");
    let quantity = match entry.get("quantity") {
        None | Some(Value::Null) => {
            errors.push(field, "quantity is required");
            None
        }
        Some(Value::Number(n)) => match n.as_u64().map(u32::try_from) {
            Some(Ok(quantity)) => Some(quantity),
            Some(Err(_)) => {
                errors.push(field, "quantity is too large");
                None
            }
            None => {
                errors.push(field, "quantity must be a non-negative integer");
                None
            }
        },
        Some(_) => {
            errors.push(field, "quantity must be a number");
            None
        }
    };

    Some(RequestedLine {
        product_id: product_id?,
        quantity: quantity?,
    })
}

/// Validates a checkout body into shipping fields and requested lines.
pub fn checkout_request(body: &Value) -> Result<(Shipping, Vec<RequestedLine>), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let Some(object) = as_object(body, &mut errors) else {
        return Err(errors);
    };

    let shipping = Shipping {
        country: required_text(object, "country", &mut errors),
        city: required_text(object, "city", &mut errors),
        address: required_text(object, "address", &mut errors),
        reference: required_text(object, "reference", &mut errors),
    };

    let mut lines = Vec::new();
    match object.get("products") {
        Some(Value::Array(entries)) if !entries.is_empty() => {
            for (index, entry) in entries.iter().enumerate() {
                if let Some(line) = cart_line(index, entry, &mut errors) {
                    lines.push(line);
                }
            }
        }
        Some(Value::Array(_)) => errors.push("products", "products must not be empty"),
        None | Some(Value::Null) => errors.push("products", "products is required"),
        Some(_) => errors.push("products", "products must be an array"),
    }

    errors.finish((shipping, lines))
}

/// Validates an admin order edit. Unknown and read-only fields are ignored.
pub fn order_patch(body: &Value) -> Result<OrderPatch, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let Some(object) = as_object(body, &mut errors) else {
        return Err(errors);
    };

    let status = match optional_text(object, "status", &mut errors) {
        Some(raw) => match raw.parse::<OrderStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                errors.push("status", "status can only be pending or completed");
                None
            }
        },
        None => None,
    };

    let patch = OrderPatch {
        country: optional_text(object, "country", &mut errors),
        city: optional_text(object, "city", &mut errors),
        address: optional_text(object, "address", &mut errors),
        reference: optional_text(object, "reference", &mut errors),
        status,
    };
    errors.finish(patch)
}

/// Validates a payment body into the order id and the processor's payment token.
pub fn payment_request(body: &Value) -> Result<(Uuid, String), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let Some(object) = as_object(body, &mut errors) else {
        return Err(errors);
    };

    let raw_id = required_text(object, "orderId", &mut errors);
    let order_id = if raw_id.is_empty() {
        None
    } else {
        let parsed = Uuid::parse_str(&raw_id).ok();
        if parsed.is_none() {
            errors.push("orderId", "orderId is not valid");
        }
        parsed
    };
    let process_id = required_text(object, "processId", &mut errors);

    match order_id {
        Some(order_id) => errors.finish((order_id, process_id)),
        None => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(errors: &ValidationErrors) -> Vec<&str> {
        errors.0.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_checkout_accepts_complete_body() {
        let body = json!({
            "country": "EC", "city": " Quito ", "address": "Av. Amazonas", "reference": "blue door",
            "products": [{"productId": "p1", "quantity": 5}, {"productId": 42, "quantity": 0}]
        });
        let (shipping, lines) = checkout_request(&body).unwrap();
        assert_eq!(shipping.city, "Quito");
        assert_eq!(lines[0], RequestedLine { product_id: "p1".into(), quantity: 5 });
        assert_eq!(lines[1], RequestedLine { product_id: "42".into(), quantity: 0 });
    }

    #[test]
    fn test_checkout_reports_every_bad_field() {
        let body = json!({
            "country": "  ", "address": "x", "reference": 7,
            "products": [{"quantity": 1}, {"productId": "p", "quantity": -1}, {"productId": "p"}]
        });
        let errors = checkout_request(&body).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec![
                "country",
                "city",
                "reference",
                "products[0].productId",
                "products[1].quantity",
                "products[2].quantity"
            ]
        );
    }

    #[test]
    fn test_checkout_needs_products() {
        let base = json!({"country": "EC", "city": "Quito", "address": "a", "reference": "r"});
        assert_eq!(fields(&checkout_request(&base).unwrap_err()), vec!["products"]);

        let mut empty = base.clone();
        empty["products"] = json!([]);
        assert_eq!(fields(&checkout_request(&empty).unwrap_err()), vec!["products"]);

        assert_eq!(fields(&checkout_request(&json!([1, 2])).unwrap_err()), vec!["body"]);
    }

    #[test]
    fn test_patch_ignores_read_only_fields() {
        let body = json!({"status": "completed", "paid": true, "totalAmount": 0, "city": "Cuenca"});
        let patch = order_patch(&body).unwrap();
        assert_eq!(patch.status, Some(OrderStatus::Completed));
        assert_eq!(patch.city.as_deref(), Some("Cuenca"));
        assert_eq!(patch.country, None);
    }

    #[test]
    fn test_patch_rejects_unknown_status() {
        let errors = order_patch(&json!({"status": "shipped"})).unwrap_err();
        assert_eq!(fields(&errors), vec!["status"]);
    }

    #[test]
    fn test_payment_body() {
        let id = Uuid::new_v4();
        let (order_id, process_id) =
            payment_request(&json!({"orderId": id.to_string(), "processId": "pm_card_visa"})).unwrap();
        assert_eq!(order_id, id);
        assert_eq!(process_id, "pm_card_visa");

        let errors = payment_request(&json!({"orderId": "nope"})).unwrap_err();
        assert_eq!(fields(&errors), vec!["orderId", "processId"]);
    }
}
