//! JSON API over the store clients.

mod error;
mod extract;
mod orders;
mod payments;
mod state;
pub mod validation;

pub use error::*;
pub use state::AppState;
#[cfg(test)]
pub use extract::AUTH_HEADER;
#[cfg(test)]
pub use orders::ORDER_DELETED;

use axum::routing::{get, post, put};
use axum::{Json, Router};

pub type ApiResult<T> = Result<Json<T>, ApiError>;

async fn health() -> &'static str {
    "ok"
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/order", post(orders::create_order).get(orders::all_orders))
        .route("/order/user", get(orders::my_orders))
        .route("/order/income", get(orders::income))
        .route(
            "/order/{id}",
            put(orders::update_order).delete(orders::delete_order).get(orders::order_detail),
        )
        .route("/payment", post(payments::pay_order))
        .with_state(state)
}
