//! # Request Handlers
//!
//! Axum request handlers for checkout, verification and status, plus the
//! page customers land on when the gateway sends them back.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sp_core::{generate_order_id, CheckoutParams, Currency, PaymentError, PaymentRecord};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout request
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    pub amount: f64,
    /// Merchant order id; generated from the key prefix when absent
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub currency: Currency,
    pub customer_name: String,
    pub customer_address: String,
    pub customer_phone: String,
    pub customer_city: String,
    #[serde(default)]
    pub customer_post_code: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub client_ip: Option<String>,
    #[serde(default)]
    pub value1: Option<String>,
    #[serde(default)]
    pub value2: Option<String>,
    #[serde(default)]
    pub value3: Option<String>,
    #[serde(default)]
    pub value4: Option<String>,
    /// Additional gateway fields, passed through
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreateCheckoutRequest {
    fn into_params(self, order_prefix: &str) -> CheckoutParams {
        let order_id = self
            .order_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| generate_order_id(order_prefix));

        CheckoutParams {
            amount: self.amount,
            order_id,
            currency: self.currency,
            customer_name: self.customer_name,
            customer_address: self.customer_address,
            customer_phone: self.customer_phone,
            customer_city: self.customer_city,
            customer_post_code: self.customer_post_code,
            customer_email: self.customer_email,
            client_ip: self.client_ip,
            value1: self.value1,
            value2: self.value2,
            value3: self.value3,
            value4: self.value4,
            extra: self.extra,
        }
    }
}

/// Create checkout response
#[derive(Debug, Serialize)]
pub struct CreateCheckoutResponse {
    /// Merchant order id sent to the gateway
    pub order_id: String,
    /// Gateway payment id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sp_order_id: Option<String>,
    /// Checkout URL (redirect user here)
    pub checkout_url: String,
}

/// Return page query (`?order_id=...` appended by the gateway)
#[derive(Debug, Deserialize)]
pub struct ReturnQuery {
    #[serde(default)]
    pub order_id: Option<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code).with_kind(err.kind().as_str());
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "shurjopay-gateway",
        "provider": state.gateway.provider_name(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a checkout session
#[instrument(skip(state, request))]
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<Json<CreateCheckoutResponse>, ApiError> {
    let params = request.into_params(&state.order_prefix);

    info!(
        "Creating checkout: order_id={}, amount={} {}",
        params.order_id, params.amount, params.currency
    );

    let transaction = state.gateway.checkout(&params).await.map_err(|e| {
        error!("Failed to create checkout: {}", e);
        payment_error_to_response(e)
    })?;

    Ok(Json(CreateCheckoutResponse {
        order_id: params.order_id,
        sp_order_id: transaction.sp_order_id,
        checkout_url: transaction.checkout_url,
    }))
}

/// Verify a payment
#[instrument(skip(state))]
pub async fn verify_payment(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<PaymentRecord>, ApiError> {
    state
        .gateway
        .verify(&order_id)
        .await
        .map(Json)
        .map_err(payment_error_to_response)
}

/// Query payment status
#[instrument(skip(state))]
pub async fn payment_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<PaymentRecord>, ApiError> {
    state
        .gateway
        .status(&order_id)
        .await
        .map(Json)
        .map_err(payment_error_to_response)
}

/// Page the gateway redirects the customer to; verifies the payment before rendering.
#[instrument(skip(state))]
pub async fn payment_return(
    State(state): State<AppState>,
    Query(query): Query<ReturnQuery>,
) -> impl IntoResponse {
    let Some(order_id) = query.order_id.filter(|id| !id.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Html(render_page("❌", "Missing order", "No order id was supplied.")),
        );
    };

    match state.gateway.verify(&order_id).await {
        Ok(record) if record.is_successful() => {
            info!("Payment verified: order_id={}", order_id);
            (
                StatusCode::OK,
                Html(render_page(
                    "✅",
                    "Payment Successful!",
                    &format!("Order <code>{}</code> was paid.", escape(&order_id)),
                )),
            )
        }
        Ok(record) => (
            StatusCode::OK,
            Html(render_page(
                "❌",
                "Payment Not Completed",
                &escape(record.sp_message.as_deref().unwrap_or("No charges were made.")),
            )),
        ),
        Err(e) => {
            error!("Verification on return failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Html(render_page(
                    "⚠️",
                    "Could Not Confirm Payment",
                    "We could not reach the payment gateway. Please check again shortly.",
                )),
            )
        }
    }
}

fn render_page(icon: &str, title: &str, body: &str) -> String {
    format!(
        r#"
<!DOCTYPE html>
<html>
<head><title>{title}</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <div style="font-size: 60px;">{icon}</div>
        <h1>{title}</h1>
        <p style="color: #666;">{body}</p>
    </div>
</body>
</html>
"#
    )
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sp_core::Operation;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_payment_error_conversion() {
        let err = PaymentError::Validation("Bad data".to_string()).during(Operation::Checkout);
        let (status, Json(body)) = payment_error_to_response(err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.kind.as_deref(), Some("validation"));
    }

    #[test]
    fn test_generated_order_id_uses_prefix() {
        let request: CreateCheckoutRequest = serde_json::from_value(serde_json::json!({
            "amount": 10,
            "customer_name": "Rahim",
            "customer_address": "House 1",
            "customer_phone": "01711111111",
            "customer_city": "Dhaka"
        }))
        .unwrap();

        let params = request.into_params("NOK");
        assert!(params.order_id.starts_with("NOK"));
        assert_eq!(params.currency, Currency::BDT);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>&"), "&lt;b&gt;&amp;");
    }
}
