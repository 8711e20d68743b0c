use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use tracing::{info, instrument};

use super::validation::payment_request;
use super::{ApiResult, AppState};
use crate::auth::Caller;
use crate::clients::PAYMENT_SUCCEEDED;

/// POST /payment
///
/// The receipt is sent in the background; its outcome never reaches the payer.
#[instrument(skip(state, body), fields(user_id = %caller.user_id))]
pub async fn pay_order(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<&'static str> {
    let Json(body) = body?;
    let (order_id, process_id) = payment_request(&body)?;
    let captured = state.payments.capture_payment(order_id, process_id).await?;
    info!(order_id = %captured.order.id, charge_id = %captured.charge_id, "Payment captured");
    // The receipt task keeps running once its handle is dropped.
    drop(captured.receipt);
    Ok(Json(PAYMENT_SUCCEEDED))
}
