use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use super::validation::ValidationErrors;
use crate::auth::AuthError;
use crate::order_actor::OrderError;
use crate::payment::PaymentError;

/// Body of every 500. The cause is logged, never returned.
pub const SERVER_ERROR: &str = "Server Error :(";

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error")]
    Validation(ValidationErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// An upstream dependency failed; only a generic message is returned.
    #[error("upstream failure: {0}")]
    Upstream(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Validation(errors) => {
                let body = json!({ "message": "Validation error", "errors": errors });
                (status, Json(body)).into_response()
            }
            Self::Upstream(detail) => {
                warn!(%detail, "Upstream failure");
                (status, Json("Payment service unavailable, try again later")).into_response()
            }
            Self::Internal(detail) => {
                error!(%detail, "Request failed");
                (status, Json(SERVER_ERROR)).into_response()
            }
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Conflict(message) => (status, Json(message)).into_response(),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidToken(_) => Self::Unauthorized(err.to_string()),
            AuthError::UnknownUser(_) => Self::Unauthorized("User not found".to_string()),
            AuthError::NotAdmin => Self::Forbidden(err.to_string()),
            AuthError::Signing(_) | AuthError::Lookup(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) => Self::NotFound("Order not found".to_string()),
            OrderError::InvalidId(_) => Self::BadRequest("Order id is not valid".to_string()),
            OrderError::InvalidProduct(_) | OrderError::AlreadyPaid(_) => Self::BadRequest(err.to_string()),
            OrderError::CaptureInFlight(_) | OrderError::NotCapturing(_) => Self::Conflict(err.to_string()),
            OrderError::ActorCommunicationError(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::UnknownOrder(_) => Self::BadRequest("order id is not valid".to_string()),
            PaymentError::AlreadyPaid(_) => Self::BadRequest("order is already paid".to_string()),
            PaymentError::InProgress(_) => Self::Conflict("payment for this order is already in progress".to_string()),
            PaymentError::Declined(message) => Self::BadRequest(message),
            PaymentError::ProcessorUnavailable(detail) => Self::Upstream(detail),
            PaymentError::InvalidAmount(_) => Self::Internal(err.to_string()),
            PaymentError::Order(order_err) => order_err.into(),
        }
    }
}
