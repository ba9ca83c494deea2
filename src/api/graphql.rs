//! The fetch-loans query contract.
//!
//! Request and response shapes follow the backend's GraphQL schema
//! (camelCase field names, IDs as strings, nullable list entries). Wire
//! records convert into [`Loan`]s leniently: null entries are dropped,
//! unparseable payment dates become undated payments.

use crate::api::backend::BackendError;
use crate::core::loan::{Loan, LoanId};
use crate::core::payment::{Payment, PaymentId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Query document sent to the GraphQL endpoint.
pub const GET_LOANS_QUERY: &str = r#"query GetLoans($filters: LoanFilter) {
  loans(filters: $filters) {
    id
    name
    principal
    dueDate
    interestRate
    payments {
      id
      paymentDate
      amount
    }
  }
}"#;

/// Optional filters on the loan list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanFilter {
    /// Case-insensitive substring of the borrower name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Exact principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

impl LoanFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            amount: None,
        }
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetLoansVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<LoanFilter>,
}

/// Body POSTed to the GraphQL endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GetLoansRequest {
    pub query: &'static str,
    pub variables: GetLoansVariables,
}

impl GetLoansRequest {
    pub fn new(filter: Option<LoanFilter>) -> Self {
        Self {
            query: GET_LOANS_QUERY,
            variables: GetLoansVariables { filters: filter },
        }
    }
}

/// A GraphQL ID may arrive as a string or a bare integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl WireId {
    pub fn into_string(self) -> String {
        match self {
            WireId::Text(s) => s,
            WireId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: WireId,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    pub id: WireId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub principal: Decimal,
    pub due_date: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
    #[serde(default)]
    pub payments: Option<Vec<Option<PaymentRecord>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoansData {
    #[serde(default)]
    pub loans: Option<Vec<Option<LoanRecord>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// Standard GraphQL response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphqlResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphqlError>,
}

fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    // Accept full timestamps too; only the calendar date matters.
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

impl PaymentRecord {
    pub fn into_payment(self, loan_id: &LoanId) -> Payment {
        let raw_date = self.payment_date.unwrap_or_default();
        let payment_date = parse_wire_date(&raw_date);
        if payment_date.is_none() {
            log::warn!(
                "payment {:?} on loan {} has unreadable date {:?}",
                self.id,
                loan_id,
                raw_date
            );
        }
        Payment::from_parts(
            PaymentId::new(self.id.into_string()),
            loan_id.clone(),
            self.amount,
            payment_date,
        )
    }

    pub fn from_payment(payment: &Payment) -> Self {
        Self {
            id: WireId::Text(payment.id().to_string()),
            payment_date: payment.payment_date().map(|d| d.to_string()),
            amount: payment.amount(),
        }
    }
}

impl LoanRecord {
    /// Convert into a domain loan. Fails only on an unreadable due date.
    pub fn into_loan(self) -> Result<Loan, BackendError> {
        let id = LoanId::new(self.id.into_string());
        let due_date = parse_wire_date(&self.due_date).ok_or_else(|| BackendError::Malformed {
            context: format!("loan {}", id),
            reason: format!("unreadable due date {:?}", self.due_date),
        })?;
        let payments = self
            .payments
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(|p| p.into_payment(&id))
            .collect();
        Ok(Loan::new(id, self.name, self.principal, due_date, self.interest_rate)
            .with_payments(payments))
    }

    pub fn from_loan(loan: &Loan) -> Self {
        Self {
            id: WireId::Text(loan.id().to_string()),
            name: loan.name().to_string(),
            principal: loan.principal(),
            due_date: loan.due_date().to_string(),
            interest_rate: loan.interest_rate(),
            payments: Some(
                loan.payments()
                    .iter()
                    .map(|p| Some(PaymentRecord::from_payment(p)))
                    .collect(),
            ),
        }
    }
}

/// Convert wire records into loans, skipping null entries and loans that
/// cannot be read.
pub fn loans_from_records(records: Vec<Option<LoanRecord>>) -> Vec<Loan> {
    records
        .into_iter()
        .flatten()
        .filter_map(|record| match record.into_loan() {
            Ok(loan) => Some(loan),
            Err(e) => {
                log::warn!("skipping loan: {}", e);
                None
            }
        })
        .collect()
}

/// Parse a fetch-loans response.
///
/// Accepts the full `{"data": {"loans": [...]}}` envelope or a bare array
/// of loan records.
pub fn parse_loans_response(json: &str) -> Result<Vec<Loan>, BackendError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.is_array() {
        let records: Vec<Option<LoanRecord>> = serde_json::from_value(value)?;
        return Ok(loans_from_records(records));
    }

    let response: GraphqlResponse<LoansData> = serde_json::from_value(value)?;
    if !response.errors.is_empty() {
        return Err(BackendError::Graphql(
            response.errors.into_iter().map(|e| e.message).collect(),
        ));
    }
    let records = response
        .data
        .and_then(|d| d.loans)
        .unwrap_or_default();
    Ok(loans_from_records(records))
}

/// Render loans as a fetch-loans response envelope.
pub fn loans_response(loans: &[Loan]) -> GraphqlResponse<LoansData> {
    GraphqlResponse {
        data: Some(LoansData {
            loans: Some(loans.iter().map(|l| Some(LoanRecord::from_loan(l))).collect()),
        }),
        errors: Vec::new(),
    }
}
