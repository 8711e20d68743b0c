use chrono::Utc;
use uuid::Uuid;

use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderPatch};
use super::actions::{OrderAction, OrderActionResult};
use super::OrderError;

impl Entity for Order {
    type Id = Uuid;
    type CreateParams = OrderCreate;
    type Patch = OrderPatch;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Error = OrderError;

    fn id(&self) -> &Uuid {
        &self.id
    }

    /// Creates a new Order from creation parameters.
    ///
    /// # Notes
    /// The order starts `pending` and unpaid; the total is derived from the lines.
    fn from_create_params(id: Uuid, params: OrderCreate) -> Result<Self, OrderError> {
        Order::new(id, params.user_id, params.shipping, params.products, Utc::now())
            .ok_or_else(|| OrderError::InvalidProduct("order total is out of range".to_string()))
    }

    /// Applies the admin-editable fields and bumps `updated_at`.
    fn on_update(&mut self, patch: OrderPatch) -> Result<(), OrderError> {
        if let Some(country) = patch.country {
            self.country = country;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(reference) = patch.reference {
            self.reference = reference;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn on_delete(&self) -> Result<(), OrderError> {
        if self.capture_in_flight {
            return Err(OrderError::CaptureInFlight(self.id.to_string()));
        }
        Ok(())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::BeginCapture => {
                if self.paid {
                    return Err(OrderError::AlreadyPaid(self.id.to_string()));
                }
                if self.capture_in_flight {
                    return Err(OrderError::CaptureInFlight(self.id.to_string()));
                }
                self.capture_in_flight = true;
                Ok(OrderActionResult::BeginCapture(self.clone()))
            }
            OrderAction::CompleteCapture => {
                if !self.capture_in_flight {
                    return Err(OrderError::NotCapturing(self.id.to_string()));
                }
                self.capture_in_flight = false;
                self.paid = true;
                self.updated_at = Utc::now();
                Ok(OrderActionResult::CompleteCapture(self.clone()))
            }
            OrderAction::AbortCapture => {
                if !self.capture_in_flight {
                    return Err(OrderError::NotCapturing(self.id.to_string()));
                }
                self.capture_in_flight = false;
                Ok(OrderActionResult::AbortCapture)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderLine, OrderStatus, Shipping};
    use rust_decimal::Decimal;

    fn order_shipping() -> Shipping {
        Shipping {
            country: "EC".into(),
            city: "Guayaquil".into(),
            address: "Malecon 2000".into(),
            reference: "near the pier".into(),
        }
    }

    fn order() -> Order {
        Order::new(Uuid::new_v4(), Uuid::new_v4(), order_shipping(), vec![], Utc::now()).unwrap()
    }

    #[test]
    fn test_overflowing_total_is_rejected_at_create() {
        let params = OrderCreate {
            user_id: Uuid::new_v4(),
            shipping: order_shipping(),
            products: vec![OrderLine { product_id: Uuid::new_v4(), quantity: 2, unit_price: Decimal::MAX }],
        };
        assert!(matches!(Order::from_create_params(Uuid::new_v4(), params), Err(OrderError::InvalidProduct(_))));
    }

    #[test]
    fn test_capture_happens_once() {
        let mut order = order();
        assert!(matches!(order.handle_action(OrderAction::BeginCapture), Ok(OrderActionResult::BeginCapture(_))));
        assert_eq!(
            order.handle_action(OrderAction::BeginCapture),
            Err(OrderError::CaptureInFlight(order.id.to_string()))
        );
        assert!(matches!(order.handle_action(OrderAction::CompleteCapture), Ok(OrderActionResult::CompleteCapture(_))));
        assert!(order.paid);
        assert_eq!(order.handle_action(OrderAction::BeginCapture), Err(OrderError::AlreadyPaid(order.id.to_string())));
    }

    #[test]
    fn test_abort_makes_order_payable_again() {
        let mut order = order();
        order.handle_action(OrderAction::BeginCapture).unwrap();
        assert_eq!(order.handle_action(OrderAction::AbortCapture), Ok(OrderActionResult::AbortCapture));
        assert!(!order.paid);
        assert!(order.handle_action(OrderAction::BeginCapture).is_ok());
    }

    #[test]
    fn test_complete_without_claim_is_rejected() {
        let mut order = order();
        assert_eq!(
            order.handle_action(OrderAction::CompleteCapture),
            Err(OrderError::NotCapturing(order.id.to_string()))
        );
        assert!(!order.paid);
    }

    #[test]
    fn test_patch_touches_only_given_fields() {
        let mut order = order();
        let before = order.updated_at;
        let patch = OrderPatch { status: Some(OrderStatus::Completed), city: Some("Cuenca".into()), ..Default::default() };
        order.on_update(patch).unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.city, "Cuenca");
        assert_eq!(order.country, "EC");
        assert!(order.updated_at >= before);
    }
}
