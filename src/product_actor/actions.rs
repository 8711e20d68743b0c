use rust_decimal::Decimal;

/// Custom actions for Product entities.
///
/// These run inside the product actor, so the stock read and the stock write
/// of a reservation can never interleave with another checkout.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Takes up to the requested amount of stock.
    ///
    /// # Arguments
    /// * `u32` - The quantity requested by the cart line
    ///
    /// Accepts `min(requested, on_hand)`; accepting zero is not an error.
    Reserve(u32),
    /// Puts previously reserved stock back on the shelf.
    Release(u32),
}

/// What a reservation actually took, priced at the moment it was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub accepted: u32,
    pub unit_price: Decimal,
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    Reserve(Reservation),
    /// Stock on hand after the release
    Release(u32),
}
