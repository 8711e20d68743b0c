use thiserror::Error;

use crate::actor_framework::{FrameworkError, StoreError};

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Invalid order id: {0}")]
    InvalidId(String),
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Order already paid: {0}")]
    AlreadyPaid(String),
    #[error("Payment already in progress for order: {0}")]
    CaptureInFlight(String),
    #[error("Order is not awaiting a charge: {0}")]
    NotCapturing(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<StoreError<OrderError>> for OrderError {
    fn from(err: StoreError<OrderError>) -> Self {
        match err {
            StoreError::Domain(e) => e,
            StoreError::Framework(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            StoreError::Framework(e) => OrderError::ActorCommunicationError(e.to_string()),
        }
    }
}
