use super::{read_number, NumberInput};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Wire format of a payment date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The record-payment form's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionField {
    Amount,
    Date,
}

/// A problem with one record-payment field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum TransactionError {
    #[error("Amount must be a valid number")]
    AmountNotANumber,
    #[error("Amount must be greater than 0")]
    AmountNotPositive,
    #[error("Date is required")]
    DateRequired,
    #[error("Invalid date format. Use YYYY-MM-DD")]
    DateMalformed,
    #[error("Date cannot be in the future")]
    DateInFuture,
}

impl TransactionError {
    pub fn field(&self) -> TransactionField {
        match self {
            TransactionError::AmountNotANumber | TransactionError::AmountNotPositive => {
                TransactionField::Amount
            }
            _ => TransactionField::Date,
        }
    }
}

/// Per-field outcome of validating the record-payment form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransactionValidation {
    pub amount: Option<TransactionError>,
    pub date: Option<TransactionError>,
}

impl TransactionValidation {
    pub fn is_valid(&self) -> bool {
        self.amount.is_none() && self.date.is_none()
    }

    pub fn errors(&self) -> Vec<TransactionError> {
        [self.amount, self.date].into_iter().flatten().collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors().iter().map(ToString::to_string).collect()
    }
}

/// Check a repayment amount: it must parse and be strictly positive.
///
/// A positive amount too large for a `Decimal` is accepted and capped at
/// [`Decimal::MAX`].
pub fn check_amount(amount: &str) -> Result<Decimal, TransactionError> {
    match read_number(amount) {
        None => Err(TransactionError::AmountNotANumber),
        Some(NumberInput::BelowRange) => Err(TransactionError::AmountNotPositive),
        Some(NumberInput::AboveRange) => {
            log::warn!("amount {:?} exceeds the representable range; capping", amount.trim());
            Ok(Decimal::MAX)
        }
        Some(NumberInput::Exact(v)) if v <= Decimal::ZERO => Err(TransactionError::AmountNotPositive),
        Some(NumberInput::Exact(v)) => Ok(v),
    }
}

/// Check a repayment date: required, `YYYY-MM-DD`, and not after `today`.
pub fn check_date(date: &str, today: NaiveDate) -> Result<NaiveDate, TransactionError> {
    let trimmed = date.trim();
    if trimmed.is_empty() {
        return Err(TransactionError::DateRequired);
    }
    let parsed = NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| TransactionError::DateMalformed)?;
    if parsed > today {
        return Err(TransactionError::DateInFuture);
    }
    Ok(parsed)
}

/// Validate the record-payment form.
///
/// `today` is the caller's local calendar date; a payment dated today is
/// accepted, one dated tomorrow is not.
pub fn validate_transaction(amount: &str, date: &str, today: NaiveDate) -> TransactionValidation {
    TransactionValidation {
        amount: check_amount(amount).err(),
        date: check_date(date, today).err(),
    }
}
