//! # Authenticated Requests
//!
//! Performs one authenticated POST against a gateway endpoint.

use serde_json::Value;
use sp_core::{PaymentResult, Token, Transport};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::token::TokenManager;

/// Attaches a valid bearer token to gateway calls.
///
/// Failures are returned as-is; there is no retry.
pub struct RequestOrchestrator {
    tokens: Arc<TokenManager>,
    transport: Arc<dyn Transport>,
}

impl RequestOrchestrator {
    pub fn new(tokens: Arc<TokenManager>, transport: Arc<dyn Transport>) -> Self {
        Self { tokens, transport }
    }

    /// Obtain a valid token (refreshing if needed), then POST `body` to `endpoint`.
    #[instrument(skip(self, body))]
    pub async fn call(&self, endpoint: &str, body: &Value) -> PaymentResult<Value> {
        let token = self.tokens.get_valid_token().await?;
        self.call_with_token(&token, endpoint, body).await
    }

    /// POST `body` to `endpoint` using a token the caller already holds.
    pub async fn call_with_token(
        &self,
        token: &Token,
        endpoint: &str,
        body: &Value,
    ) -> PaymentResult<Value> {
        debug!("POST {}", endpoint);
        self.transport
            .post(endpoint, body, &auth_headers(token))
            .await
    }
}

/// `Authorization` and `content-type` headers for an authenticated call
pub fn auth_headers(token: &Token) -> Vec<(String, String)> {
    vec![
        ("Authorization".to_string(), token.authorization()),
        ("content-type".to_string(), "application/json".to_string()),
    ]
}
