use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument, warn, Instrument};
use uuid::Uuid;

use crate::actor_framework::ResourceClient;
use crate::clients::ProductClient;
use crate::domain::{
    income_window_start, monthly_income, CartPolicy, DetailLine, MonthlyIncome, Order, OrderCreate, OrderDetail,
    OrderLine, OrderPatch, Shipping,
};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use crate::product_actor::ProductError;

/// A cart line as submitted, before it is checked against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestedLine {
    pub product_id: String,
    pub quantity: u32,
}

/// Why a single cart line did not make it into the order.
enum LineRejection {
    /// The line is unusable; the cart policy decides what happens next.
    Skipped(&'static str),
    /// The catalog could not be reached; checkout cannot continue.
    Failed(OrderError),
}

/// Client for interacting with the Order actor.
///
/// This client handles the checkout orchestration: every cart line is
/// reserved against the catalog before the order is written, and the
/// reservations are handed back if checkout does not complete.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    product_client: ProductClient,
    policy: CartPolicy,
}

impl_client_methods!(OrderClient, Order, OrderError, order);

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, product_client: ProductClient, policy: CartPolicy) -> Self {
        Self {
            inner,
            product_client,
            policy,
        }
    }

    /// Reserves the cart and writes the order.
    ///
    /// Runs on its own task, so reservations are either recorded in an order
    /// or handed back even when the caller stops waiting.
    #[instrument(skip(self, shipping, lines), fields(user_id = %user_id, lines = lines.len()))]
    pub async fn place_order(
        &self,
        user_id: Uuid,
        shipping: Shipping,
        lines: Vec<RequestedLine>,
    ) -> Result<Order, OrderError> {
        info!("Processing place_order request");
        let this = self.clone();
        tokio::spawn(async move { this.checkout(user_id, shipping, lines).await }.in_current_span())
            .await
            .map_err(|e| OrderError::ActorCommunicationError(format!("checkout task failed: {e}")))?
    }

    async fn checkout(&self, user_id: Uuid, shipping: Shipping, lines: Vec<RequestedLine>) -> Result<Order, OrderError> {
        // Step 1: Reserve every line against live stock
        let mut accepted: Vec<OrderLine> = Vec::with_capacity(lines.len());
        for (index, line) in lines.into_iter().enumerate() {
            match self.reserve_line(&line).await {
                Ok(order_line) => accepted.push(order_line),
                Err(LineRejection::Skipped(reason)) if self.policy == CartPolicy::Lenient => {
                    debug!(index, product_id = %line.product_id, reason, "Dropping cart line");
                }
                Err(LineRejection::Skipped(reason)) => {
                    warn!(index, product_id = %line.product_id, reason, "Rejecting checkout");
                    self.release_lines(&accepted).await;
                    return Err(OrderError::InvalidProduct(format!(
                        "products[{index}] ({}): {reason}",
                        line.product_id
                    )));
                }
                Err(LineRejection::Failed(e)) => {
                    error!(error = %e, "Stock reservation failed");
                    self.release_lines(&accepted).await;
                    return Err(e);
                }
            }
        }

        // Step 2: Write the order
        let params = OrderCreate {
            user_id,
            shipping,
            products: accepted.clone(),
        };
        match self.inner.create(params).await {
            Ok(order) => {
                info!(order_id = %order.id, total = %order.total_amount, lines = order.products.len(), "Order created");
                Ok(order)
            }
            Err(e) => {
                error!(error = %e, "Order write failed");
                self.release_lines(&accepted).await;
                Err(e.into())
            }
        }
    }

    async fn reserve_line(&self, line: &RequestedLine) -> Result<OrderLine, LineRejection> {
        let Ok(product_id) = Uuid::parse_str(line.product_id.trim()) else {
            return Err(LineRejection::Skipped("malformed product id"));
        };
        if line.quantity == 0 {
            return Err(LineRejection::Skipped("zero quantity"));
        }
        match self.product_client.reserve_stock(product_id, line.quantity).await {
            Ok(reservation) if reservation.accepted == 0 => Err(LineRejection::Skipped("out of stock")),
            Ok(reservation) => Ok(OrderLine {
                product_id,
                quantity: reservation.accepted,
                unit_price: reservation.unit_price,
            }),
            Err(ProductError::NotFound(_)) => Err(LineRejection::Skipped("unknown product")),
            Err(e) => Err(LineRejection::Failed(OrderError::ActorCommunicationError(e.to_string()))),
        }
    }

    async fn release_lines(&self, lines: &[OrderLine]) {
        for line in lines {
            if let Err(e) = self.product_client.release_stock(line.product_id, line.quantity).await {
                warn!(product_id = %line.product_id, quantity = line.quantity, error = %e, "Could not release stock");
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn update_order(&self, id: Uuid, patch: OrderPatch) -> Result<Order, OrderError> {
        info!("Processing update_order request");
        self.inner.update(id, patch).await.map_err(OrderError::from)
    }

    /// Removes an order. Stock held by an unpaid order goes back to the catalog.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: Uuid) -> Result<Order, OrderError> {
        info!("Processing delete_order request");
        let order = self.inner.delete(id).await.map_err(OrderError::from)?;
        if !order.paid {
            self.release_lines(&order.products).await;
        }
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.list_orders(move |order| order.user_id == user_id).await?;
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.list_orders(|_| true).await?;
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }

    /// Joins an order's lines to the current catalog.
    ///
    /// Lines whose product has since disappeared are left out.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn order_detail(&self, order: Order) -> Result<OrderDetail, OrderError> {
        let mut lines = Vec::with_capacity(order.products.len());
        for line in &order.products {
            match self.product_client.get_product(line.product_id).await {
                Ok(Some(product)) => lines.push(DetailLine {
                    product_id: product.id,
                    name: product.name,
                    price: product.price,
                    quantity: line.quantity,
                }),
                Ok(None) => debug!(product_id = %line.product_id, "Product gone, omitting line"),
                Err(e) => return Err(OrderError::ActorCommunicationError(e.to_string())),
            }
        }
        Ok(OrderDetail::new(order, lines))
    }

    #[instrument(skip(self))]
    pub async fn monthly_income(&self, now: DateTime<Utc>) -> Result<Vec<MonthlyIncome>, OrderError> {
        let start = income_window_start(now);
        let orders = self.list_orders(move |order| order.created_at >= start).await?;
        let income = monthly_income(&orders, now);
        info!(orders = orders.len(), months = income.len(), "Income aggregated");
        Ok(income)
    }

    // --- Payment transitions ---

    #[instrument(skip(self))]
    pub async fn begin_capture(&self, id: Uuid) -> Result<Order, OrderError> {
        match self.inner.perform_action(id, OrderAction::BeginCapture).await? {
            OrderActionResult::BeginCapture(order) => Ok(order),
            other => Err(OrderError::ActorCommunicationError(format!("Unexpected result: {other:?}"))),
        }
    }

    #[instrument(skip(self))]
    pub async fn complete_capture(&self, id: Uuid) -> Result<Order, OrderError> {
        match self.inner.perform_action(id, OrderAction::CompleteCapture).await? {
            OrderActionResult::CompleteCapture(order) => Ok(order),
            other => Err(OrderError::ActorCommunicationError(format!("Unexpected result: {other:?}"))),
        }
    }

    #[instrument(skip(self))]
    pub async fn abort_capture(&self, id: Uuid) -> Result<(), OrderError> {
        match self.inner.perform_action(id, OrderAction::AbortCapture).await? {
            OrderActionResult::AbortCapture => Ok(()),
            other => Err(OrderError::ActorCommunicationError(format!("Unexpected result: {other:?}"))),
        }
    }
}
