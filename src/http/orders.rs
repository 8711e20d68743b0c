use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use super::extract::AdminCaller;
use super::validation::{checkout_request, order_patch};
use super::{ApiError, ApiResult, AppState};
use crate::auth::Caller;
use crate::domain::{MonthlyIncome, Order, OrderDetail};
use crate::order_actor::OrderError;

pub const ORDER_DELETED: &str = "Order has been deleted...";

fn order_id(raw: &str) -> Result<Uuid, OrderError> {
    Uuid::parse_str(raw.trim()).map_err(|_| OrderError::InvalidId(raw.to_string()))
}

/// POST /order
#[instrument(skip(state, body), fields(user_id = %caller.user_id))]
pub async fn create_order(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(body) = body?;
    let (shipping, lines) = checkout_request(&body)?;
    let order = state.orders.place_order(caller.user_id, shipping, lines).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PUT /order/{id}
#[instrument(skip(state, body), fields(admin_id = %admin.0.user_id))]
pub async fn update_order(
    State(state): State<AppState>,
    admin: AdminCaller,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Order> {
    let id = order_id(&id)?;
    let Json(body) = body?;
    let patch = order_patch(&body)?;
    let order = state.orders.update_order(id, patch).await?;
    info!(order_id = %order.id, status = %order.status, "Order updated");
    Ok(Json(order))
}

/// DELETE /order/{id}
#[instrument(skip(state), fields(user_id = %caller.user_id))]
pub async fn delete_order(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<&'static str> {
    let id = order_id(&id)?;
    let order = state.orders.get_order(id).await?.ok_or_else(|| OrderError::NotFound(id.to_string()))?;
    state.gate.require_owner_or_admin(&caller, order.user_id).await?;
    state.orders.delete_order(id).await?;
    Ok(Json(ORDER_DELETED))
}

/// GET /order/user
#[instrument(skip(state), fields(user_id = %caller.user_id))]
pub async fn my_orders(State(state): State<AppState>, caller: Caller) -> ApiResult<Vec<Order>> {
    Ok(Json(state.orders.orders_for_user(caller.user_id).await?))
}

/// GET /order
pub async fn all_orders(State(state): State<AppState>, _admin: AdminCaller) -> ApiResult<Vec<Order>> {
    Ok(Json(state.orders.all_orders().await?))
}

/// GET /order/income
pub async fn income(State(state): State<AppState>, _admin: AdminCaller) -> ApiResult<Vec<MonthlyIncome>> {
    Ok(Json(state.orders.monthly_income(Utc::now()).await?))
}

/// GET /order/{id}
#[instrument(skip(state), fields(user_id = %caller.user_id))]
pub async fn order_detail(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<OrderDetail> {
    let id = order_id(&id)?;
    let order = state.orders.get_order(id).await?.ok_or_else(|| OrderError::NotFound(id.to_string()))?;
    state.gate.require_owner_or_admin(&caller, order.user_id).await?;
    Ok(Json(state.orders.order_detail(order).await?))
}
