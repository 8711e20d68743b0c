use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn, Instrument};
use uuid::Uuid;

use crate::clients::OrderClient;
use crate::domain::Order;
use crate::order_actor::OrderError;
use crate::payment::{to_minor_units, ChargeRequest, PaymentError, PaymentProcessor, ReceiptNotifier};

/// Body returned to the payer once the processor has captured the funds.
pub const PAYMENT_SUCCEEDED: &str = "Pago exitoso";

/// Outcome of a successful capture.
#[derive(Debug)]
pub struct CapturedPayment {
    pub order: Order,
    pub charge_id: String,
    /// The detached receipt task. Awaiting it is optional.
    pub receipt: JoinHandle<()>,
}

/// Client that turns a pending order into a paid one.
///
/// The order actor hands out a single capture claim per order, so at most one
/// caller ever reaches the processor for a given order.
#[derive(Clone)]
pub struct PaymentClient {
    orders: OrderClient,
    processor: Arc<dyn PaymentProcessor>,
    notifier: ReceiptNotifier,
    currency: String,
    shop_name: String,
}

impl PaymentClient {
    pub fn new(
        orders: OrderClient,
        processor: Arc<dyn PaymentProcessor>,
        notifier: ReceiptNotifier,
        currency: impl Into<String>,
        shop_name: impl Into<String>,
    ) -> Self {
        Self {
            orders,
            processor,
            notifier,
            currency: currency.into(),
            shop_name: shop_name.into(),
        }
    }

    /// Claims, charges and settles `order_id`.
    ///
    /// The work runs on its own task. Dropping the returned future does not
    /// cancel it, so a claimed order always ends up paid or released.
    #[instrument(skip(self, process_id))]
    pub async fn capture_payment(&self, order_id: Uuid, process_id: String) -> Result<CapturedPayment, PaymentError> {
        info!("Processing capture_payment request");
        let this = self.clone();
        tokio::spawn(async move { this.settle(order_id, process_id).await }.in_current_span())
            .await
            .map_err(|e| PaymentError::Order(OrderError::ActorCommunicationError(format!("capture task failed: {e}"))))?
    }

    async fn settle(&self, order_id: Uuid, process_id: String) -> Result<CapturedPayment, PaymentError> {
        // Step 1: Claim the order. Paid or already-claimed orders stop here.
        let order = self.orders.begin_capture(order_id).await.map_err(PaymentError::from)?;

        // Step 2: Charge
        let Some(amount_minor) = to_minor_units(order.total_amount) else {
            self.release_claim(order_id).await;
            return Err(PaymentError::InvalidAmount(order.total_amount.to_string()));
        };
        let request = ChargeRequest {
            amount_minor,
            currency: self.currency.clone(),
            description: format!("Charge for order {order_id} placed at {}.", self.shop_name),
            payment_method: process_id,
            idempotency_key: order_id.to_string(),
        };
        let charge = match self.processor.charge(request).await {
            Ok(charge) => charge,
            Err(e) => {
                warn!(error = %e, "Charge failed, releasing order");
                self.release_claim(order_id).await;
                return Err(e.into());
            }
        };

        // Step 3: Flip the paid flag
        let paid = match self.orders.complete_capture(order_id).await {
            Ok(order) => order,
            Err(e) => {
                error!(charge_id = %charge.id, error = %e, "Charge captured but order could not be marked paid");
                return Err(PaymentError::Order(e));
            }
        };
        info!(charge_id = %charge.id, total = %paid.total_amount, "Order paid");

        // Step 4: Receipt, best effort
        let receipt = self.notifier.spawn(paid.clone());

        Ok(CapturedPayment {
            order: paid,
            charge_id: charge.id,
            receipt,
        })
    }

    async fn release_claim(&self, order_id: Uuid) {
        if let Err(e) = self.orders.abort_capture(order_id).await {
            warn!(error = %e, "Could not release capture claim");
        }
    }
}
