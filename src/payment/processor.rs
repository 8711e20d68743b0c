use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::app_system::PaymentConfig;

/// A single immediate-capture charge.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    /// Amount in the smallest currency unit (cents for USD)
    pub amount_minor: i64,
    pub currency: String,
    pub description: String,
    /// Opaque payment method token supplied by the buyer's client
    pub payment_method: String,
    /// Repeating a request with the same key never charges twice
    pub idempotency_key: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Charge {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProcessorError {
    /// The processor refused the charge; the message is safe to show the buyer.
    #[error("{0}")]
    Declined(String),
    #[error("{0}")]
    Unavailable(String),
}

/// External service that authorizes and captures funds.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn charge(&self, request: ChargeRequest) -> Result<Charge, ProcessorError>;
}

/// Converts a decimal amount to minor units, rounding half away from zero.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Sorts a non-2xx processor response into "buyer's problem" and "ours".
fn classify_failure(status: StatusCode, body: ErrorBody) -> ProcessorError {
    let message = body
        .error
        .message
        .unwrap_or_else(|| format!("payment failed with status {status}"));
    let card_error = body.error.kind.as_deref() == Some("card_error");
    let buyer_side = status == StatusCode::PAYMENT_REQUIRED
        || (status.is_client_error()
            && !matches!(
                status,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
            ));
    if card_error || buyer_side {
        ProcessorError::Declined(message)
    } else {
        ProcessorError::Unavailable(message)
    }
}

/// Payment-intents client for Stripe or any API speaking the same dialect.
pub struct StripeProcessor {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl StripeProcessor {
    pub fn new(config: &PaymentConfig) -> Result<Self, ProcessorError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProcessorError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }
}

#[async_trait]
impl PaymentProcessor for StripeProcessor {
    #[instrument(skip(self, request), fields(amount = request.amount_minor, currency = %request.currency))]
    async fn charge(&self, request: ChargeRequest) -> Result<Charge, ProcessorError> {
        debug!("Sending charge");
        let amount = request.amount_minor.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", request.currency.as_str()),
            ("description", request.description.as_str()),
            ("payment_method", request.payment_method.as_str()),
            ("payment_method_types[]", "card"),
            ("confirm", "true"),
        ];
        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .header("Idempotency-Key", &request.idempotency_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| ProcessorError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            let err = classify_failure(status, body);
            warn!(%status, error = %err, "Charge refused");
            return Err(err);
        }

        let charge: Charge = response
            .json()
            .await
            .map_err(|e| ProcessorError::Unavailable(format!("unreadable processor response: {e}")))?;
        if charge.status != "succeeded" {
            return Err(ProcessorError::Declined(format!(
                "payment was not completed (status: {})",
                charge.status
            )));
        }
        debug!(charge_id = %charge.id, "Charge succeeded");
        Ok(charge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Form, Json, Router};
    use std::collections::HashMap;

    #[test]
    fn test_minor_units_round_half_away_from_zero() {
        assert_eq!(to_minor_units(Decimal::new(600, 2)), Some(600));
        assert_eq!(to_minor_units(Decimal::new(3_889, 3)), Some(389));
        assert_eq!(to_minor_units(Decimal::new(1_005, 3)), Some(101));
        assert_eq!(to_minor_units(Decimal::ZERO), Some(0));
        assert_eq!(to_minor_units(Decimal::MAX), None);
    }

    #[test]
    fn test_failure_classification() {
        let declined = ErrorBody {
            error: ErrorDetail { message: Some("Your card was declined.".into()), kind: Some("card_error".into()) },
        };
        assert_eq!(
            classify_failure(StatusCode::PAYMENT_REQUIRED, declined),
            ProcessorError::Declined("Your card was declined.".into())
        );
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, ErrorBody::default()),
            ProcessorError::Declined(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::UNAUTHORIZED, ErrorBody::default()),
            ProcessorError::Unavailable(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::BAD_GATEWAY, ErrorBody::default()),
            ProcessorError::Unavailable(_)
        ));
    }

    /// Minimal stand-in for the payment-intents endpoint.
    async fn fake_intents(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> axum::response::Response {
        use axum::response::IntoResponse;
        assert_eq!(headers.get("authorization").unwrap(), "Bearer sk_test");
        assert_eq!(headers.get("idempotency-key").unwrap(), "order-1");
        assert_eq!(form["confirm"], "true");
        if form["payment_method"] == "pm_card_chargeDeclined" {
            let body = serde_json::json!({"error": {"type": "card_error", "message": "Your card was declined."}});
            return (StatusCode::PAYMENT_REQUIRED, Json(body)).into_response();
        }
        assert_eq!(form["amount"], "600");
        Json(serde_json::json!({"id": "pi_123", "status": "succeeded"})).into_response()
    }

    async fn start_fake() -> StripeProcessor {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/v1/payment_intents", post(fake_intents));
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let config = PaymentConfig {
            api_base: format!("http://{addr}/"),
            secret_key: "sk_test".into(),
            ..PaymentConfig::default()
        };
        StripeProcessor::new(&config).unwrap()
    }

    fn request(payment_method: &str) -> ChargeRequest {
        ChargeRequest {
            amount_minor: 600,
            currency: "usd".into(),
            description: "order-1".into(),
            payment_method: payment_method.into(),
            idempotency_key: "order-1".into(),
        }
    }

    #[tokio::test]
    async fn test_successful_charge() {
        let processor = start_fake().await;
        let charge = processor.charge(request("pm_card_visa")).await.unwrap();
        assert_eq!(charge, Charge { id: "pi_123".into(), status: "succeeded".into() });
    }

    #[tokio::test]
    async fn test_declined_charge_carries_processor_message() {
        let processor = start_fake().await;
        let err = processor.charge(request("pm_card_chargeDeclined")).await.unwrap_err();
        assert_eq!(err, ProcessorError::Declined("Your card was declined.".into()));
    }
}
