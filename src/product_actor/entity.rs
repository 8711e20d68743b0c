use uuid::Uuid;

use crate::actor_framework::Entity;
use crate::domain::Product;
use super::actions::{ProductAction, ProductActionResult, Reservation};
use super::ProductError;

impl Entity for Product {
    type Id = Uuid;
    type CreateParams = (); // The catalog comes from the seed file
    type Patch = (); // Catalog management is outside this service
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn from_create_params(_id: Uuid, _params: ()) -> Result<Self, ProductError> {
        Err(ProductError::ReadOnly("products are loaded from the seed file"))
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), ProductError> {
        Ok(())
    }

    /// Handles product-specific actions.
    ///
    /// # Actions
    /// - `Reserve(amount)`: clamps to stock on hand, decrements it and bumps `sold`
    /// - `Release(amount)`: restores stock and rolls `sold` back
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::Reserve(0) => Err(ProductError::InvalidQuantity(0)),
            ProductAction::Reserve(requested) => {
                let accepted = requested.min(self.quantity);
                self.quantity -= accepted;
                self.sold = self.sold.saturating_add(accepted);
                Ok(ProductActionResult::Reserve(Reservation { accepted, unit_price: self.price }))
            }
            ProductAction::Release(amount) => {
                self.quantity = self.quantity.saturating_add(amount);
                self.sold = self.sold.saturating_sub(amount);
                Ok(ProductActionResult::Release(self.quantity))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_reserve_clamps_to_stock() {
        let mut product = Product::new("Aceite Girasol 1L", Decimal::new(200, 2), 3);
        let result = product.handle_action(ProductAction::Reserve(5)).unwrap();
        assert_eq!(
            result,
            ProductActionResult::Reserve(Reservation { accepted: 3, unit_price: Decimal::new(200, 2) })
        );
        assert_eq!(product.quantity, 0);
        assert_eq!(product.sold, 3);

        // Sold out: nothing more to take
        let result = product.handle_action(ProductAction::Reserve(1)).unwrap();
        assert_eq!(result, ProductActionResult::Reserve(Reservation { accepted: 0, unit_price: Decimal::new(200, 2) }));
    }

    #[test]
    fn test_release_restores_stock() {
        let mut product = Product::new("Arroz 2kg", Decimal::new(250, 2), 10);
        product.handle_action(ProductAction::Reserve(4)).unwrap();
        let result = product.handle_action(ProductAction::Release(4)).unwrap();
        assert_eq!(result, ProductActionResult::Release(10));
        assert_eq!(product.sold, 0);
    }

    #[test]
    fn test_catalog_cannot_be_created_through_the_store() {
        assert_eq!(
            Product::from_create_params(Uuid::new_v4(), ()),
            Err(ProductError::ReadOnly("products are loaded from the seed file"))
        );
    }

    #[test]
    fn test_zero_reservation_is_rejected() {
        let mut product = Product::new("Leche 1L", Decimal::ONE, 10);
        assert_eq!(product.handle_action(ProductAction::Reserve(0)), Err(ProductError::InvalidQuantity(0)));
    }
}
