use tracing::{debug, instrument};
use uuid::Uuid;

use crate::actor_framework::ResourceClient;
use crate::domain::Product;
use crate::product_actor::{ProductAction, ProductActionResult, ProductError, Reservation};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    /// Atomically takes up to `quantity` units of stock.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: Uuid, quantity: u32) -> Result<Reservation, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::Reserve(quantity)).await? {
            ProductActionResult::Reserve(reservation) => Ok(reservation),
            other => Err(ProductError::ActorCommunicationError(format!("Unexpected result: {other:?}"))),
        }
    }

    /// Returns reserved units to stock. Yields the new on-hand quantity.
    #[instrument(skip(self))]
    pub async fn release_stock(&self, id: Uuid, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::Release(quantity)).await? {
            ProductActionResult::Release(on_hand) => Ok(on_hand),
            other => Err(ProductError::ActorCommunicationError(format!("Unexpected result: {other:?}"))),
        }
    }
}
