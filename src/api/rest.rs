//! The record-payment command contract: `POST /loans/{loanId}/payments`.

use crate::core::loan::LoanId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Path of the record-payment endpoint for a loan.
pub fn payments_path(loan_id: &LoanId) -> String {
    format!("/loans/{}/payments", loan_id)
}

/// Full URL of the record-payment endpoint under `base_url`.
pub fn payments_url(base_url: &str, loan_id: &LoanId) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), payments_path(loan_id))
}

/// JSON body of a record-payment request.
///
/// # Examples
///
/// ```
/// use loan_desk::api::rest::PaymentRequest;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let request = PaymentRequest::new(dec!(2500), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
/// assert_eq!(request.to_json().unwrap(), r#"{"amount":2500.0,"date":"2024-03-15"}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
}

impl PaymentRequest {
    pub fn new(amount: Decimal, date: NaiveDate) -> Self {
        Self { amount, date }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Response body of the record-payment endpoint.
///
/// Only success versus failure matters to the desk; the stored payment
/// is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaymentResponse {
    Created {
        message: String,
        payment: serde_json::Value,
    },
    Failed {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl PaymentResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, PaymentResponse::Created { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_paths() {
        let id = LoanId::new("4");
        assert_eq!(payments_path(&id), "/loans/4/payments");
        assert_eq!(
            payments_url("http://localhost:5000/", &id),
            "http://localhost:5000/loans/4/payments"
        );
    }

    #[test]
    fn test_request_body() {
        let request = PaymentRequest::new(
            dec!(150.5),
            NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
        );
        let value: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(value["amount"], 150.5);
        assert_eq!(value["date"], "2024-01-09");
    }

    #[test]
    fn test_response_variants() {
        let ok: PaymentResponse = serde_json::from_str(
            r#"{"message": "Payment created successfully", "payment": {"id": 5}}"#,
        )
        .unwrap();
        assert!(ok.is_success());

        let failed: PaymentResponse =
            serde_json::from_str(r#"{"error": "Loan with ID 9 not found"}"#).unwrap();
        assert!(!failed.is_success());
    }
}
