//! # sp-gateway
//!
//! shurjoPay gateway client.
//!
//! The client authenticates with the gateway, caches the bearer token for its
//! advertised lifetime, and runs three operations on top of it:
//!
//! 1. **checkout** - start a checkout session at the gateway-chosen execute URL
//! 2. **verify** - confirm a payment once the customer returns
//! 3. **status** - query a payment's current state
//!
//! Concurrent operations that find no valid token share a single
//! authentication request.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sp_gateway::ShurjopayClient;
//! use sp_core::{CheckoutParams, Currency, PaymentGateway};
//!
//! // Create client from environment (SP_ENDPOINT, SP_USERNAME, ...)
//! let client = ShurjopayClient::from_env()?;
//!
//! let params = CheckoutParams::new(100.0, "A1", Currency::BDT)
//!     .with_customer("Rahim", "01711111111", "House 1, Road 2", "Dhaka");
//! let transaction = client.checkout(&params).await?;
//!
//! // Redirect the customer to transaction.checkout_url, then on return:
//! let record = client.verify(&sp_order_id).await?;
//! assert!(record.is_successful());
//! ```

pub mod client;
pub mod config;
pub mod http;
pub mod orchestrator;
pub mod report;
pub mod token;

// Re-exports
pub use client::ShurjopayClient;
pub use config::{GatewayConfig, SANDBOX_ROOT_URL};
pub use http::HttpTransport;
pub use orchestrator::RequestOrchestrator;
pub use report::{Reporter, TracingReporter};
pub use token::TokenManager;
