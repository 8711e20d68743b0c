use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fulfilment state of an order. Independent of the paid flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(format!("status can only be pending or completed, got {other:?}")),
        }
    }
}

/// What checkout does with a cart line that cannot be fulfilled
/// (malformed product id, zero quantity, unknown or sold-out product).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartPolicy {
    /// Drop the line and keep going.
    #[default]
    Lenient,
    /// Fail the whole checkout.
    Strict,
}

impl FromStr for CartPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown cart policy {other:?}")),
        }
    }
}

/// One accepted line of an order, priced at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderLine {
    /// `None` when the line price does not fit in a `Decimal`.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Shipping fields supplied at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipping {
    pub country: String,
    pub city: String,
    pub address: String,
    pub reference: String,
}

/// Represents a customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub country: String,
    pub city: String,
    pub address: String,
    pub reference: String,
    pub products: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub paid: bool,
    /// Set while a processor charge for this order is outstanding.
    #[serde(skip)]
    pub capture_in_flight: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds a pending, unpaid order. Returns `None` if the total overflows.
    pub fn new(
        id: Uuid,
        user_id: Uuid,
        shipping: Shipping,
        products: Vec<OrderLine>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let total_amount = products
            .iter()
            .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.subtotal()?))?;
        Some(Self {
            id,
            user_id,
            country: shipping.country,
            city: shipping.city,
            address: shipping.address,
            reference: shipping.reference,
            products,
            total_amount,
            status: OrderStatus::Pending,
            paid: false,
            capture_in_flight: false,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Payload for creating a new order. The total is derived from the lines.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: Uuid,
    pub shipping: Shipping,
    pub products: Vec<OrderLine>,
}

/// Admin-editable subset of an order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub country: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub reference: Option<String>,
    pub status: Option<OrderStatus>,
}

/// An order line joined with the current catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailLine {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Order view returned by the detail endpoint: the lines carry the current
/// catalog name and price instead of the checkout-time price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub country: String,
    pub city: String,
    pub address: String,
    pub reference: String,
    pub products: Vec<DetailLine>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderDetail {
    pub fn new(order: Order, products: Vec<DetailLine>) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            country: order.country,
            city: order.city,
            address: order.address,
            reference: order.reference,
            products,
            total_amount: order.total_amount,
            status: order.status,
            paid: order.paid,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
