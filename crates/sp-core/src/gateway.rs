//! # Payment Gateway Trait
//!
//! The three operations a merchant performs against the gateway.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PaymentGateway (trait)                     │
//! │  ├── checkout()   start a checkout session                  │
//! │  ├── verify()     confirm a completed payment               │
//! │  └── status()     query a payment's current state           │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!          ┌─────────────────┴─────────────────┐
//!  ┌───────┴────────┐                  ┌───────┴───────┐
//!  │ShurjopayClient │                  │  test doubles │
//!  └────────────────┘                  └───────────────┘
//! ```

use crate::checkout::{CheckoutParams, Transaction};
use crate::error::PaymentResult;
use crate::record::{StatusResult, VerificationResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Gateway operations. Every failure is reported as
/// [`PaymentError::Operation`](crate::PaymentError::Operation) wrapping its cause.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a checkout session; redirect the customer to `checkout_url`.
    async fn checkout(&self, params: &CheckoutParams) -> PaymentResult<Transaction>;

    /// Verify a payment after the customer returns.
    async fn verify(&self, order_id: &str) -> PaymentResult<VerificationResult>;

    /// Query the current status of a payment.
    async fn status(&self, order_id: &str) -> PaymentResult<StatusResult>;

    /// Provider name, for logging.
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type SharedPaymentGateway = Arc<dyn PaymentGateway>;
