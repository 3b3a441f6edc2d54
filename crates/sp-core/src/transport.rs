//! # Transport
//!
//! The HTTP seam between the client and the gateway.

use crate::error::PaymentResult;
use async_trait::async_trait;
use serde_json::Value;

/// Request headers as `(name, value)` pairs
pub type Headers = [(String, String)];

/// JSON-over-HTTP POST transport.
///
/// Implementations map failures onto [`PaymentError`](crate::PaymentError):
/// - network errors and timeouts → `Transport`
/// - non-2xx responses → `Gateway { status: Some(code), .. }`
/// - bodies that are not JSON → `Serialization`
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, body: &Value, headers: &Headers) -> PaymentResult<Value>;
}
