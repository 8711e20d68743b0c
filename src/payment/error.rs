use thiserror::Error;

use crate::order_actor::OrderError;
use super::ProcessorError;

/// Errors that can occur while capturing a payment.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("Order not found: {0}")]
    UnknownOrder(String),
    #[error("Order already paid: {0}")]
    AlreadyPaid(String),
    #[error("Payment already in progress for order: {0}")]
    InProgress(String),
    #[error("Order total cannot be charged: {0}")]
    InvalidAmount(String),
    #[error("{0}")]
    Declined(String),
    #[error("Payment processor unavailable: {0}")]
    ProcessorUnavailable(String),
    #[error(transparent)]
    Order(OrderError),
}

impl From<OrderError> for PaymentError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => PaymentError::UnknownOrder(id),
            OrderError::AlreadyPaid(id) => PaymentError::AlreadyPaid(id),
            OrderError::CaptureInFlight(id) => PaymentError::InProgress(id),
            other => PaymentError::Order(other),
        }
    }
}

impl From<ProcessorError> for PaymentError {
    fn from(err: ProcessorError) -> Self {
        match err {
            ProcessorError::Declined(message) => PaymentError::Declined(message),
            ProcessorError::Unavailable(message) => PaymentError::ProcessorUnavailable(message),
        }
    }
}
