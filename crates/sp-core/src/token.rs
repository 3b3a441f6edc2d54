//! # Bearer Tokens
//!
//! Token issued by the gateway's `get_token` endpoint.

use crate::clock::Clock;
use chrono::{DateTime, Utc};
use std::fmt;

/// A gateway-issued bearer token.
///
/// Never mutated; a refresh replaces it wholesale.
#[derive(Clone, PartialEq)]
pub struct Token {
    /// Opaque token value
    pub value: String,
    /// Token type, e.g. "Bearer"
    pub token_type: String,
    /// Local time the token was received
    pub created_at: DateTime<Utc>,
    /// Validity window in seconds (`expires_in`)
    pub ttl_seconds: i64,
    /// Checkout execution URL chosen by the gateway for this session
    pub execute_url: Option<String>,
    /// Store identifier handed out alongside the token
    pub store_id: Option<serde_json::Value>,
    /// Gateway's own `TokenCreateTime`, kept verbatim
    pub issued_at: Option<String>,
}

impl Token {
    /// Valid iff fewer than `ttl_seconds` whole seconds have elapsed since `created_at`.
    pub fn is_valid(&self, clock: &dyn Clock) -> bool {
        clock.elapsed_seconds(self.created_at, clock.now()) < self.ttl_seconds
    }

    /// `Authorization` header value: `"<token_type> <value>"`
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("value", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("created_at", &self.created_at)
            .field("ttl_seconds", &self.ttl_seconds)
            .field("execute_url", &self.execute_url)
            .field("store_id", &self.store_id)
            .finish()
    }
}
