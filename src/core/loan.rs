use crate::core::payment::{sort_most_recent_first, Payment};
use crate::core::status::{resolve_status, LoanStatus, PaymentStatus, StatusThresholds};
use crate::format::format_currency;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a loan as issued by the backend.
///
/// # Examples
///
/// ```
/// use loan_desk::core::loan::LoanId;
///
/// let a = LoanId::new("1");
/// let b = LoanId::from("2");
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(String);

impl LoanId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LoanId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A loan as returned by the fetch-loans query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    id: LoanId,
    name: String,
    /// Amount borrowed. Integral in the source data.
    principal: Decimal,
    due_date: NaiveDate,
    /// Annual interest rate in percent (13 means 13%).
    interest_rate: Decimal,
    #[serde(default)]
    payments: Vec<Payment>,
}

impl Loan {
    pub fn new(
        id: LoanId,
        name: impl Into<String>,
        principal: Decimal,
        due_date: NaiveDate,
        interest_rate: Decimal,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            principal,
            due_date,
            interest_rate,
            payments: Vec::new(),
        }
    }

    pub fn with_payments(mut self, payments: Vec<Payment>) -> Self {
        self.payments = payments;
        self
    }

    pub fn add_payment(&mut self, payment: Payment) {
        self.payments.push(payment);
    }

    pub fn id(&self) -> &LoanId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn principal(&self) -> Decimal {
        self.principal
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }
}

/// A loan together with the fields derived from its payments.
///
/// The derived fields are only ever produced by [`LoanSummary::evaluate`];
/// there are no setters. Build a new summary when the payments change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    loan: Loan,
    payment_status: PaymentStatus,
}

impl LoanSummary {
    /// Derive status fields and order the payments most recent first.
    pub fn evaluate(mut loan: Loan, now: DateTime<Utc>, thresholds: &StatusThresholds) -> Self {
        let payment_status = resolve_status(&loan.payments, now, thresholds);
        sort_most_recent_first(&mut loan.payments);
        Self {
            loan,
            payment_status,
        }
    }

    pub fn loan(&self) -> &Loan {
        &self.loan
    }

    pub fn id(&self) -> &LoanId {
        self.loan.id()
    }

    pub fn status(&self) -> LoanStatus {
        self.payment_status.status
    }

    pub fn days_overdue(&self) -> u32 {
        self.payment_status.days_overdue
    }

    pub fn total_paid(&self) -> Decimal {
        self.payment_status.total_paid
    }

    pub fn payment_status(&self) -> &PaymentStatus {
        &self.payment_status
    }

    /// Payments, most recent first.
    pub fn payments(&self) -> &[Payment] {
        self.loan.payments()
    }

    pub fn into_loan(self) -> Loan {
        self.loan
    }
}

impl fmt::Display for LoanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loan = &self.loan;
        writeln!(f, "[{}] {}", loan.id, loan.name)?;
        writeln!(f, "  Principal:     {}", format_currency(loan.principal, false))?;
        writeln!(f, "  Interest rate: {}%", loan.interest_rate)?;
        writeln!(f, "  Due date:      {}", loan.due_date)?;
        writeln!(f, "  Status:        {}", self.status())?;
        writeln!(f, "  Days overdue:  {}", self.days_overdue())?;
        writeln!(f, "  Total paid:    {}", format_currency(self.total_paid(), false))?;
        for payment in self.payments() {
            let date = payment
                .payment_date()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "unknown date".to_string());
            writeln!(
                f,
                "    {:<12} {:>16}",
                date,
                format_currency(payment.amount_or_zero(), false)
            )?;
        }
        Ok(())
    }
}
