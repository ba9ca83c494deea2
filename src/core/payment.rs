use crate::core::loan::LoanId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identifier of a repayment as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PaymentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A single repayment made against a loan.
///
/// Payments are immutable once received from the backend. Both the amount
/// and the date may be missing in the source data: a missing amount counts
/// as zero, and a missing or unparseable date leaves `payment_date` empty so
/// the payment never wins the "latest payment" comparison.
///
/// # Examples
///
/// ```
/// use loan_desk::core::loan::LoanId;
/// use loan_desk::core::payment::Payment;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let payment = Payment::new(
///     "1",
///     LoanId::new("7"),
///     dec!(2500),
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
/// );
///
/// assert_eq!(payment.amount_or_zero(), dec!(2500));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    loan_id: LoanId,
    amount: Option<Decimal>,
    payment_date: Option<NaiveDate>,
}

impl Payment {
    pub fn new(
        id: impl Into<PaymentId>,
        loan_id: LoanId,
        amount: Decimal,
        payment_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            loan_id,
            amount: Some(amount),
            payment_date: Some(payment_date),
        }
    }

    /// Build a payment straight from backend fields, keeping gaps as-is.
    pub fn from_parts(
        id: PaymentId,
        loan_id: LoanId,
        amount: Option<Decimal>,
        payment_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            loan_id,
            amount,
            payment_date,
        }
    }

    pub fn id(&self) -> &PaymentId {
        &self.id
    }

    pub fn loan_id(&self) -> &LoanId {
        &self.loan_id
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }

    pub fn payment_date(&self) -> Option<NaiveDate> {
        self.payment_date
    }
}

impl From<String> for PaymentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Sum of all payment amounts, missing amounts counted as zero.
pub fn total_paid(payments: &[Payment]) -> Decimal {
    payments.iter().map(Payment::amount_or_zero).sum()
}

/// The most recent valid payment date, if any payment carries one.
pub fn latest_payment_date(payments: &[Payment]) -> Option<NaiveDate> {
    payments.iter().filter_map(Payment::payment_date).max()
}

/// Order payments most recent first. Undated payments sink to the end.
///
/// The sort is stable, so payments sharing a date keep their backend order.
pub fn sort_most_recent_first(payments: &mut [Payment]) {
    payments.sort_by(|a, b| match (a.payment_date, b.payment_date) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(id: &str, amount: Option<Decimal>, when: Option<NaiveDate>) -> Payment {
        Payment::from_parts(PaymentId::new(id), LoanId::new("1"), amount, when)
    }

    #[test]
    fn test_total_paid_treats_missing_amount_as_zero() {
        let payments = vec![
            payment("1", Some(dec!(100)), Some(date(2024, 1, 1))),
            payment("2", None, Some(date(2024, 2, 1))),
            payment("3", Some(dec!(250.50)), Some(date(2024, 3, 1))),
        ];
        assert_eq!(total_paid(&payments), dec!(350.50));
    }

    #[test]
    fn test_total_paid_empty() {
        assert_eq!(total_paid(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_latest_date_skips_undated() {
        let payments = vec![
            payment("1", Some(dec!(1)), Some(date(2024, 1, 1))),
            payment("2", Some(dec!(1)), None),
            payment("3", Some(dec!(1)), Some(date(2024, 5, 9))),
        ];
        assert_eq!(latest_payment_date(&payments), Some(date(2024, 5, 9)));
    }

    #[test]
    fn test_latest_date_all_undated() {
        let payments = vec![payment("1", Some(dec!(1)), None)];
        assert_eq!(latest_payment_date(&payments), None);
    }

    #[test]
    fn test_sort_most_recent_first() {
        let mut payments = vec![
            payment("old", Some(dec!(1)), Some(date(2023, 12, 31))),
            payment("undated", Some(dec!(1)), None),
            payment("new", Some(dec!(1)), Some(date(2024, 6, 1))),
            payment("mid", Some(dec!(1)), Some(date(2024, 2, 14))),
        ];
        sort_most_recent_first(&mut payments);
        let order: Vec<&str> = payments.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(order, vec!["new", "mid", "old", "undated"]);
    }
}
