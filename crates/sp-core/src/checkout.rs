//! # Checkout Types
//!
//! Caller-supplied checkout parameters and the gateway's checkout session
//! descriptor.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Currencies accepted by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    BDT,
    USD,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::BDT => "BDT",
            Currency::USD => "USD",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::BDT
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order and customer fields for a checkout request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutParams {
    /// Amount to charge, in major units
    pub amount: f64,

    /// Merchant-generated order id
    pub order_id: String,

    pub currency: Currency,

    pub customer_name: String,
    pub customer_address: String,
    pub customer_phone: String,
    pub customer_city: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_post_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    /// IP address of the customer's device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,

    /// Free-form fields echoed back on verification (product name/id etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value4: Option<String>,

    /// Any further gateway fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CheckoutParams {
    /// Create params with the required order fields; customer fields start empty.
    pub fn new(amount: f64, order_id: impl Into<String>, currency: Currency) -> Self {
        Self {
            amount,
            order_id: order_id.into(),
            currency,
            customer_name: String::new(),
            customer_address: String::new(),
            customer_phone: String::new(),
            customer_city: String::new(),
            customer_post_code: None,
            customer_email: None,
            client_ip: None,
            value1: None,
            value2: None,
            value3: None,
            value4: None,
            extra: Map::new(),
        }
    }

    /// Set the required customer identity fields
    pub fn with_customer(
        mut self,
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        self.customer_name = name.into();
        self.customer_phone = phone.into();
        self.customer_address = address.into();
        self.customer_city = city.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    /// Set a pass-through field not modelled above
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Structural checks only; the gateway owns the business rules.
    pub fn validate(&self) -> PaymentResult<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(PaymentError::Validation(format!(
                "amount must be a positive number, got {}",
                self.amount
            )));
        }

        let required = [
            ("order_id", &self.order_id),
            ("customer_name", &self.customer_name),
            ("customer_address", &self.customer_address),
            ("customer_phone", &self.customer_phone),
            ("customer_city", &self.customer_city),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(PaymentError::Validation(format!("{} is required", field)));
            }
        }

        Ok(())
    }

    /// Serialize into a JSON object ready to be merged with session fields
    pub fn to_payload(&self) -> PaymentResult<Map<String, Value>> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(PaymentError::Serialization(
                "checkout params did not serialize to an object".to_string(),
            )),
            Err(e) => Err(PaymentError::Serialization(e.to_string())),
        }
    }
}

/// Generate a merchant order id: `prefix` followed by 12 random hex chars.
pub fn generate_order_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &suffix[..12])
}

/// Checkout session returned by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Where the customer completes the payment
    pub checkout_url: String,

    #[serde(default, deserialize_with = "crate::de::option_f64")]
    pub amount: Option<f64>,

    #[serde(default)]
    pub currency: Option<String>,

    /// Gateway payment id
    #[serde(default)]
    pub sp_order_id: Option<String>,

    /// Echo of the merchant order id
    #[serde(default)]
    pub customer_order_id: Option<String>,

    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub customer_city: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub client_ip: Option<String>,

    /// Purpose of the payment, e.g. "sale"
    #[serde(default)]
    pub intent: Option<String>,

    #[serde(rename = "transactionStatus", default)]
    pub transaction_status: Option<String>,

    /// Fields not modelled above, as returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> CheckoutParams {
        CheckoutParams::new(100.0, "A1", Currency::BDT).with_customer(
            "Rahim",
            "01711111111",
            "House 1, Road 2",
            "Dhaka",
        )
    }

    #[test]
    fn test_valid_params() {
        assert!(params().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let mut p = params();
        p.amount = 0.0;
        assert!(matches!(p.validate(), Err(PaymentError::Validation(_))));

        p.amount = f64::NAN;
        assert!(matches!(p.validate(), Err(PaymentError::Validation(_))));
    }

    #[test]
    fn test_rejects_blank_customer_field() {
        let mut p = params();
        p.customer_city = "  ".into();
        match p.validate() {
            Err(PaymentError::Validation(msg)) => assert!(msg.contains("customer_city")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_payload_skips_unset_optionals_and_flattens_extra() {
        let payload = params()
            .with_extra("customer_country", "Bangladesh")
            .to_payload()
            .unwrap();

        assert_eq!(payload["currency"], json!("BDT"));
        assert_eq!(payload["customer_country"], json!("Bangladesh"));
        assert!(!payload.contains_key("value1"));
        assert!(!payload.contains_key("extra"));
    }

    #[test]
    fn test_generate_order_id() {
        let id = generate_order_id("NOK");
        assert!(id.starts_with("NOK"));
        assert_eq!(id.len(), 15);
        assert_ne!(id, generate_order_id("NOK"));
    }

    #[test]
    fn test_transaction_accepts_string_amounts() {
        let tx: Transaction = serde_json::from_value(json!({
            "checkout_url": "https://sandbox.shurjopayment.com/spaycheckout/?token=abc",
            "amount": "100.00",
            "currency": "BDT",
            "sp_order_id": "NOK63a2f3e1a3f1b",
            "customer_order_id": "A1",
            "transactionStatus": "Initiated",
            "merchant_logo": "logo.png"
        }))
        .unwrap();

        assert_eq!(tx.amount, Some(100.0));
        assert_eq!(tx.transaction_status.as_deref(), Some("Initiated"));
        assert_eq!(tx.extra["merchant_logo"], json!("logo.png"));
    }
}
