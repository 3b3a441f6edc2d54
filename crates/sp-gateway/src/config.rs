//! # Gateway Configuration
//!
//! Configuration management for the shurjoPay integration.
//! Secrets are loaded from environment variables.

use sp_core::{Credentials, PaymentError, PaymentResult};
use std::env;
use std::time::Duration;

/// Sandbox gateway, for integration testing
pub const SANDBOX_ROOT_URL: &str = "https://sandbox.shurjopayment.com";

/// Default HTTP timeout for gateway calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Gateway client configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Merchant credentials and gateway root URL
    pub credentials: Credentials,

    /// Per-request timeout enforced by the HTTP transport
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `SP_ENDPOINT` (gateway root URL)
    /// - `SP_USERNAME`
    /// - `SP_PASSWORD`
    /// - `SP_PREFIX` (merchant key prefix)
    /// - `SP_RETURN_URL`
    ///
    /// Optional: `SP_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> PaymentResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let credentials = Credentials::configure(
            require_var("SP_ENDPOINT")?,
            require_var("SP_USERNAME")?,
            require_var("SP_PASSWORD")?,
            require_var("SP_PREFIX")?,
            require_var("SP_RETURN_URL")?,
        )?;

        let timeout_secs = match env::var("SP_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                PaymentError::Validation(format!("SP_TIMEOUT_SECS must be a number, got {:?}", raw))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self::new(credentials).with_timeout(Duration::from_secs(timeout_secs)))
    }

    /// Create config with explicit credentials
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Builder: set the HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check if pointed at the sandbox gateway
    pub fn is_sandbox(&self) -> bool {
        self.credentials.root_url() == SANDBOX_ROOT_URL
    }
}

fn require_var(name: &str) -> PaymentResult<String> {
    env::var(name).map_err(|_| PaymentError::Validation(format!("{} not set", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(root: &str) -> Credentials {
        Credentials::configure(root, "sp_sandbox", "secret", "NOK", "https://shop.example.com/return")
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::new(credentials(SANDBOX_ROOT_URL));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.is_sandbox());
    }

    #[test]
    fn test_with_timeout() {
        let config = GatewayConfig::new(credentials("https://engine.shurjopayment.com"))
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.is_sandbox());
    }

    #[test]
    fn test_from_env_missing_key() {
        env::remove_var("SP_USERNAME");

        let result = GatewayConfig::from_env();
        assert!(matches!(result, Err(PaymentError::Validation(_))));
    }
}
