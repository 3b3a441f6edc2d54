//! # sp-core
//!
//! Core types and traits for the shurjoPay gateway client.
//!
//! This crate provides:
//! - `Credentials` and the endpoint URLs derived from them
//! - `Token` with its expiry rule, and the `Clock` it is judged by
//! - `Transport`, the HTTP seam the client talks through
//! - `CheckoutParams`, `Transaction` and `PaymentRecord` wire types
//! - `PaymentGateway`, the checkout / verify / status operations
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use sp_core::{CheckoutParams, Currency, PaymentGateway};
//!
//! let params = CheckoutParams::new(100.0, "A1", Currency::BDT)
//!     .with_customer("Rahim", "01711111111", "House 1, Road 2", "Dhaka");
//!
//! let transaction = gateway.checkout(&params).await?;
//! // Redirect the customer to transaction.checkout_url
//! ```

pub mod checkout;
pub mod clock;
pub mod credentials;
mod de;
pub mod error;
pub mod gateway;
pub mod record;
pub mod token;
pub mod transport;

// Re-exports for convenience
pub use checkout::{generate_order_id, CheckoutParams, Currency, Transaction};
pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::{payment_status_url, token_url, verification_url, Credentials};
pub use error::{ErrorKind, Operation, PaymentError, PaymentResult};
pub use gateway::{PaymentGateway, SharedPaymentGateway};
pub use record::{PaymentRecord, StatusResult, VerificationResult};
pub use token::Token;
pub use transport::{Headers, Transport};
