//! # Payment Error Types
//!
//! Typed error handling for the shurjoPay client.
//! All gateway operations return `Result<T, PaymentError>`.

use std::fmt;
use thiserror::Error;

/// The gateway operation a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Checkout,
    Verify,
    Status,
}

impl Operation {
    /// Short name used in logs and API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Checkout => "checkout",
            Operation::Verify => "verify",
            Operation::Status => "status",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Operation::Checkout => "making payment",
            Operation::Verify => "verifying payment",
            Operation::Status => "fetching payment status",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Coarse classification of a [`PaymentError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Transport,
    Gateway,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Transport => "transport",
            ErrorKind::Gateway => "gateway",
        }
    }
}

/// Core error type for all gateway operations.
///
/// `Clone` so that a single authentication outcome can be handed to every
/// caller waiting on it.
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    /// Malformed or missing configuration / request fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Token endpoint unreachable, credentials rejected or malformed auth response
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Network-level failure (connect, timeout, broken body)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response or a gateway-reported error payload
    #[error("Gateway error{}: {message}", http_suffix(.status))]
    Gateway {
        status: Option<u16>,
        message: String,
    },

    /// Gateway payload could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A checkout / verify / status call failed
    #[error("Error occurred while {operation}: {source}")]
    Operation {
        operation: Operation,
        #[source]
        source: Box<PaymentError>,
    },
}

impl PaymentError {
    /// Wrap this error as the failure of `operation`
    pub fn during(self, operation: Operation) -> Self {
        PaymentError::Operation {
            operation,
            source: Box::new(self),
        }
    }

    /// Create a gateway error without an HTTP status
    pub fn gateway(message: impl Into<String>) -> Self {
        PaymentError::Gateway {
            status: None,
            message: message.into(),
        }
    }

    /// The innermost error, looking through operation wrappers
    pub fn root_cause(&self) -> &PaymentError {
        match self {
            PaymentError::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Classify the error by its root cause
    pub fn kind(&self) -> ErrorKind {
        match self.root_cause() {
            PaymentError::Validation(_) => ErrorKind::Validation,
            PaymentError::Authentication(_) => ErrorKind::Authentication,
            PaymentError::Transport(_) => ErrorKind::Transport,
            PaymentError::Gateway { .. }
            | PaymentError::Serialization(_)
            | PaymentError::Operation { .. } => ErrorKind::Gateway,
        }
    }

    /// Returns true if a caller may reasonably try again.
    /// Nothing in this workspace retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self.root_cause() {
            PaymentError::Transport(_) => true,
            PaymentError::Gateway { status, .. } => matches!(status, Some(s) if *s >= 500 || *s == 429),
            _ => false,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self.root_cause() {
            PaymentError::Validation(_) => 400,
            PaymentError::Authentication(_) => 502,
            PaymentError::Transport(_) => 503,
            PaymentError::Gateway { .. } => 502,
            PaymentError::Serialization(_) => 502,
            PaymentError::Operation { .. } => 500,
        }
    }
}

fn http_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" [HTTP {}]", code),
        None => String::new(),
    }
}

/// Result type alias for gateway operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_wrapping_keeps_root_cause() {
        let err = PaymentError::Authentication("bad credentials".into()).during(Operation::Verify);

        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(matches!(err.root_cause(), PaymentError::Authentication(_)));
        assert_eq!(
            err.to_string(),
            "Error occurred while verifying payment: Authentication failed: bad credentials"
        );
    }

    #[test]
    fn test_gateway_display() {
        let err = PaymentError::Gateway {
            status: Some(401),
            message: "Unauthorized".into(),
        };
        assert_eq!(err.to_string(), "Gateway error [HTTP 401]: Unauthorized");
        assert_eq!(PaymentError::gateway("oops").to_string(), "Gateway error: oops");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(PaymentError::Transport("timeout".into()).is_retryable());
        assert!(PaymentError::Gateway {
            status: Some(503),
            message: "down".into()
        }
        .during(Operation::Status)
        .is_retryable());
        assert!(!PaymentError::Validation("bad data".into()).is_retryable());
        assert!(!PaymentError::gateway("rejected").is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(PaymentError::Validation("x".into()).status_code(), 400);
        assert_eq!(PaymentError::Transport("x".into()).status_code(), 503);
        assert_eq!(
            PaymentError::Validation("x".into())
                .during(Operation::Checkout)
                .status_code(),
            400
        );
    }
}
