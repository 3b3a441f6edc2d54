//! # Merchant Credentials
//!
//! Gateway base URL and merchant credentials, plus the fixed endpoint URLs
//! derived from them. Endpoint URLs are computed on demand, never stored.

use crate::error::{PaymentError, PaymentResult};
use std::fmt;

/// Path of the token endpoint, relative to the root URL
pub const TOKEN_PATH: &str = "/api/get_token";
/// Path of the verification endpoint
pub const VERIFICATION_PATH: &str = "/api/verification";
/// Path of the payment status endpoint
pub const PAYMENT_STATUS_PATH: &str = "/api/payment-status";

/// Merchant credentials. Immutable once configured.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    root_url: String,
    merchant_username: String,
    merchant_password: String,
    merchant_key_prefix: String,
    return_url: String,
}

impl Credentials {
    /// Validate and build a credential set.
    ///
    /// All fields are required; `root_url` and `return_url` must be http(s)
    /// URLs. A trailing `/` on `root_url` is dropped.
    pub fn configure(
        root_url: impl Into<String>,
        merchant_username: impl Into<String>,
        merchant_password: impl Into<String>,
        merchant_key_prefix: impl Into<String>,
        return_url: impl Into<String>,
    ) -> PaymentResult<Self> {
        let root_url = required("root_url", root_url.into())?;
        let merchant_username = required("merchant_username", merchant_username.into())?;
        let merchant_password = required("merchant_password", merchant_password.into())?;
        let merchant_key_prefix = required("merchant_key_prefix", merchant_key_prefix.into())?;
        let return_url = required("return_url", return_url.into())?;

        require_http("root_url", &root_url)?;
        require_http("return_url", &return_url)?;

        Ok(Self {
            root_url: root_url.trim_end_matches('/').to_string(),
            merchant_username,
            merchant_password,
            merchant_key_prefix,
            return_url,
        })
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn merchant_username(&self) -> &str {
        &self.merchant_username
    }

    pub fn merchant_password(&self) -> &str {
        &self.merchant_password
    }

    pub fn merchant_key_prefix(&self) -> &str {
        &self.merchant_key_prefix
    }

    pub fn return_url(&self) -> &str {
        &self.return_url
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("root_url", &self.root_url)
            .field("merchant_username", &self.merchant_username)
            .field("merchant_password", &"<redacted>")
            .field("merchant_key_prefix", &self.merchant_key_prefix)
            .field("return_url", &self.return_url)
            .finish()
    }
}

/// `{root_url}/api/get_token`
pub fn token_url(credentials: &Credentials) -> String {
    format!("{}{}", credentials.root_url, TOKEN_PATH)
}

/// `{root_url}/api/verification`
pub fn verification_url(credentials: &Credentials) -> String {
    format!("{}{}", credentials.root_url, VERIFICATION_PATH)
}

/// `{root_url}/api/payment-status`
pub fn payment_status_url(credentials: &Credentials) -> String {
    format!("{}{}", credentials.root_url, PAYMENT_STATUS_PATH)
}

fn required(field: &str, value: String) -> PaymentResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PaymentError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn require_http(field: &str, value: &str) -> PaymentResult<()> {
    if value.starts_with("https://") || value.starts_with("http://") {
        Ok(())
    } else {
        Err(PaymentError::Validation(format!(
            "{} must be an http(s) URL, got {:?}",
            field, value
        )))
    }
}
