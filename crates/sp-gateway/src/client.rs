//! # shurjoPay Client
//!
//! Checkout, verification and status operations on top of the
//! authenticated request path.

use async_trait::async_trait;
use serde_json::{json, Value};
use sp_core::{
    payment_status_url, verification_url, CheckoutParams, Clock, Credentials, Operation,
    PaymentError, PaymentGateway, PaymentRecord, PaymentResult, StatusResult, SystemClock,
    Transaction, Transport, VerificationResult,
};
use std::sync::Arc;
use tracing::{info, instrument, Level};

use crate::config::GatewayConfig;
use crate::http::HttpTransport;
use crate::orchestrator::RequestOrchestrator;
use crate::report::{Reporter, TracingReporter};
use crate::token::TokenManager;

/// shurjoPay gateway client.
///
/// Cheap to share behind an `Arc`; the cached token lives inside and is
/// reused across operations until it expires.
pub struct ShurjopayClient {
    credentials: Arc<Credentials>,
    tokens: Arc<TokenManager>,
    orchestrator: RequestOrchestrator,
    reporter: Arc<dyn Reporter>,
}

impl ShurjopayClient {
    /// Create a client with the reqwest transport, system clock and tracing reporter
    pub fn new(config: GatewayConfig) -> PaymentResult<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::from_parts(
            config.credentials,
            Arc::new(transport),
            Arc::new(SystemClock),
            Arc::new(TracingReporter),
        ))
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = GatewayConfig::from_env()?;
        Self::new(config)
    }

    /// Assemble a client from explicit collaborators
    pub fn from_parts(
        credentials: Credentials,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        let credentials = Arc::new(credentials);
        let tokens = Arc::new(TokenManager::new(
            Arc::clone(&credentials),
            Arc::clone(&transport),
            clock,
            Arc::clone(&reporter),
        ));
        let orchestrator = RequestOrchestrator::new(Arc::clone(&tokens), transport);

        Self {
            credentials,
            tokens,
            orchestrator,
            reporter,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The token manager backing this client
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    async fn try_checkout(&self, params: &CheckoutParams) -> PaymentResult<Transaction> {
        params.validate()?;

        let token = self.tokens.get_valid_token().await?;
        let execute_url = token.execute_url.clone().ok_or_else(|| {
            PaymentError::Authentication("auth response carried no execute_url".to_string())
        })?;

        let mut payload = params.to_payload()?;
        payload.insert(
            "prefix".to_string(),
            json!(self.credentials.merchant_key_prefix()),
        );
        payload.insert(
            "store_id".to_string(),
            token.store_id.clone().unwrap_or(Value::Null),
        );
        payload.insert("token".to_string(), json!(token.value));
        payload.insert("return_url".to_string(), json!(self.credentials.return_url()));
        payload.insert("cancel_url".to_string(), json!(self.credentials.return_url()));

        let response = self
            .orchestrator
            .call_with_token(&token, &execute_url, &Value::Object(payload))
            .await?;

        parse_transaction(response)
    }

    async fn try_lookup(&self, endpoint: String, order_id: &str) -> PaymentResult<PaymentRecord> {
        if order_id.trim().is_empty() {
            return Err(PaymentError::Validation("order_id is required".to_string()));
        }

        let response = self
            .orchestrator
            .call(&endpoint, &json!({ "order_id": order_id }))
            .await?;

        PaymentRecord::from_response(response, order_id)
    }

    /// Log and wrap a failure of `operation`
    fn fail(&self, operation: Operation, cause: PaymentError) -> PaymentError {
        let err = cause.during(operation);
        self.reporter.log(Level::ERROR, &err.to_string());
        err
    }
}

#[async_trait]
impl PaymentGateway for ShurjopayClient {
    #[instrument(skip(self, params), fields(order_id = %params.order_id))]
    async fn checkout(&self, params: &CheckoutParams) -> PaymentResult<Transaction> {
        let transaction = self
            .try_checkout(params)
            .await
            .map_err(|e| self.fail(Operation::Checkout, e))?;

        info!(
            "Created shurjoPay checkout: sp_order_id={:?}, url={}",
            transaction.sp_order_id, transaction.checkout_url
        );
        Ok(transaction)
    }

    #[instrument(skip(self))]
    async fn verify(&self, order_id: &str) -> PaymentResult<VerificationResult> {
        self.try_lookup(verification_url(&self.credentials), order_id)
            .await
            .map_err(|e| self.fail(Operation::Verify, e))
    }

    #[instrument(skip(self))]
    async fn status(&self, order_id: &str) -> PaymentResult<StatusResult> {
        self.try_lookup(payment_status_url(&self.credentials), order_id)
            .await
            .map_err(|e| self.fail(Operation::Status, e))
    }

    fn provider_name(&self) -> &'static str {
        "shurjopay"
    }
}

/// Decode a checkout response; a body without `checkout_url` is a gateway-reported error.
fn parse_transaction(response: Value) -> PaymentResult<Transaction> {
    if response.get("checkout_url").and_then(|v| v.as_str()).is_none() {
        let message = ["message", "sp_message"]
            .iter()
            .find_map(|key| response.get(*key).and_then(|v| v.as_str()))
            .unwrap_or("checkout response carried no checkout_url");
        return Err(PaymentError::gateway(message));
    }

    serde_json::from_value(response).map_err(|e| {
        PaymentError::Serialization(format!("Failed to parse checkout response: {}", e))
    })
}
