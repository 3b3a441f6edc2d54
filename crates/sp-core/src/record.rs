//! # Payment Records
//!
//! Records returned by the verification and payment-status endpoints.
//! Both endpoints answer with the same shape, keyed by the gateway order id.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `sp_code` reported for a successful payment
pub const SUCCESS_CODE: i64 = 1000;

/// A payment record as reported by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(default, deserialize_with = "crate::de::option_i64")]
    pub id: Option<i64>,

    /// Gateway payment id (the `order_id` from the return callback)
    #[serde(default)]
    pub order_id: Option<String>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default, deserialize_with = "crate::de::option_f64")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::option_f64")]
    pub payable_amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::option_f64")]
    pub discount_amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::option_f64")]
    pub disc_percent: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::option_f64")]
    pub received_amount: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::option_f64")]
    pub usd_amt: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::option_f64")]
    pub usd_rate: Option<f64>,

    /// Payment method, e.g. "bKash" or "Visa"
    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub sp_message: Option<String>,
    #[serde(default, deserialize_with = "crate::de::option_i64")]
    pub sp_code: Option<i64>,

    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub value1: Option<String>,
    #[serde(default)]
    pub value2: Option<String>,
    #[serde(default)]
    pub value3: Option<String>,
    #[serde(default)]
    pub value4: Option<String>,

    /// Fields not modelled above, as returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of `POST /api/verification`
pub type VerificationResult = PaymentRecord;

/// Result of `POST /api/payment-status`
pub type StatusResult = PaymentRecord;

impl PaymentRecord {
    /// Decode a verification/status response for `order_id`.
    ///
    /// The gateway answers with either a bare object or a one-element array.
    /// An empty array, or a record that carries an error code but no order id,
    /// is a gateway error.
    pub fn from_response(response: Value, order_id: &str) -> PaymentResult<Self> {
        let raw = match response {
            Value::Array(items) => items.into_iter().next().ok_or_else(|| {
                PaymentError::gateway(format!("no payment record returned for order {}", order_id))
            })?,
            other => other,
        };

        let record: PaymentRecord = serde_json::from_value(raw).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse payment record: {}", e))
        })?;

        if record.order_id.is_none() {
            let message = record
                .sp_message
                .clone()
                .or_else(|| {
                    record
                        .extra
                        .get("message")
                        .and_then(|v| v.as_str())
                        .map(String::from)
                })
                .unwrap_or_else(|| format!("no payment record returned for order {}", order_id));
            return Err(PaymentError::gateway(message));
        }

        Ok(record)
    }

    /// True when the gateway reports the payment as successful
    pub fn is_successful(&self) -> bool {
        self.sp_code == Some(SUCCESS_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": 4431,
            "order_id": "NOK63a2f3e1a3f1b",
            "currency": "BDT",
            "amount": "100.00",
            "payable_amount": 100,
            "discount_amount": null,
            "disc_percent": 0,
            "received_amount": "100.00",
            "usd_amt": 0.97,
            "usd_rate": 103.5,
            "method": "bKash",
            "sp_message": "Success",
            "sp_code": "1000",
            "name": "Rahim",
            "email": "rahim@example.com",
            "address": "House 1, Road 2",
            "city": "Dhaka",
            "value1": "sku-42",
            "date_time": "2024-01-01 10:00:00"
        })
    }

    #[test]
    fn test_parses_single_element_array() {
        let record = PaymentRecord::from_response(json!([sample()]), "NOK63a2f3e1a3f1b").unwrap();

        assert_eq!(record.order_id.as_deref(), Some("NOK63a2f3e1a3f1b"));
        assert_eq!(record.amount, Some(100.0));
        assert_eq!(record.discount_amount, None);
        assert_eq!(record.sp_code, Some(1000));
        assert!(record.is_successful());
        assert_eq!(record.extra["date_time"], json!("2024-01-01 10:00:00"));
    }

    #[test]
    fn test_parses_bare_object() {
        let record = PaymentRecord::from_response(sample(), "NOK63a2f3e1a3f1b").unwrap();
        assert_eq!(record.method.as_deref(), Some("bKash"));
    }

    #[test]
    fn test_empty_array_is_gateway_error() {
        let err = PaymentRecord::from_response(json!([]), "missing").unwrap_err();
        assert!(matches!(err, PaymentError::Gateway { .. }));
    }

    #[test]
    fn test_error_payload_is_gateway_error() {
        let err = PaymentRecord::from_response(
            json!([{ "sp_code": "1011", "message": "Invalid Order ID" }]),
            "bogus",
        )
        .unwrap_err();

        match err {
            PaymentError::Gateway { message, .. } => assert_eq!(message, "Invalid Order ID"),
            other => panic!("expected gateway error, got {:?}", other),
        }
    }

    #[test]
    fn test_declined_payment_is_not_successful() {
        let mut raw = sample();
        raw["sp_code"] = json!(1002);
        let record = PaymentRecord::from_response(raw, "NOK63a2f3e1a3f1b").unwrap();
        assert!(!record.is_successful());
    }
}
