//! # HTTP Transport
//!
//! `reqwest`-backed [`Transport`] for talking JSON to the gateway.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use sp_core::{Headers, PaymentError, PaymentResult, Transport};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// JSON-over-HTTPS transport with a per-request timeout.
///
/// Timeouts and connection failures surface as `PaymentError::Transport`;
/// there is no retry at this layer.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PaymentError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, body, headers))]
    async fn post(&self, url: &str, body: &Value, headers: &Headers) -> PaymentResult<Value> {
        let payload = serde_json::to_vec(body)
            .map_err(|e| PaymentError::Serialization(format!("Failed to encode request: {}", e)))?;

        let response = self
            .client
            .post(url)
            .headers(header_map(headers)?)
            .body(payload)
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        if !status.is_success() {
            error!("shurjoPay API error: status={}, body={}", status, text);
            return Err(PaymentError::Gateway {
                status: Some(status.as_u16()),
                message: gateway_message(&text).unwrap_or_else(|| format!("HTTP {}: {}", status, text)),
            });
        }

        debug!("shurjoPay API response: status={}, bytes={}", status, text.len());

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse shurjoPay response: {}", e))
        })
    }
}

/// JSON content type plus caller headers; a caller header replaces a default of the same name.
fn header_map(headers: &Headers) -> PaymentResult<HeaderMap> {
    let mut map = HeaderMap::new();
    map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| PaymentError::Validation(format!("invalid header name {:?}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| PaymentError::Validation(format!("invalid value for header {}: {}", name, e)))?;
        map.insert(name, value);
    }

    Ok(map)
}

/// Pull a human-readable message out of a gateway error body, if it has one
fn gateway_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = match &value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    ["message", "sp_message"]
        .iter()
        .find_map(|key| object.get(*key).and_then(|v| v.as_str()))
        .map(String::from)
}
