use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    /// Units on hand.
    pub quantity: u32,
    #[serde(default)]
    pub sold: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[cfg(test)]
impl Product {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            price,
            category: String::new(),
            quantity,
            sold: 0,
            photo: None,
        }
    }
}
