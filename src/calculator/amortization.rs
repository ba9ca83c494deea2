use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::format::format_currency;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Convert an annual percentage rate into a monthly fraction (13 -> 0.010833…).
pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / MONTHS_PER_YEAR / PERCENT
}

/// Level monthly payment that repays `principal` over `months`.
///
/// `M = P * r(1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate.
/// Returns `None` when the formula is undefined for the inputs (a zero
/// rate divides by zero) or overflows.
pub fn monthly_payment(principal: Decimal, annual_rate_percent: Decimal, months: Decimal) -> Option<Decimal> {
    let r = monthly_rate(annual_rate_percent);
    let growth = (Decimal::ONE + r).checked_powd(months)?;
    let numerator = principal.checked_mul(r.checked_mul(growth)?)?;
    numerator.checked_div(growth - Decimal::ONE)
}

/// Totals of a fixed-payment loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationQuote {
    pub principal: Decimal,
    pub annual_rate_percent: Decimal,
    pub term_months: Decimal,
    pub monthly_payment: Decimal,
    /// Interest paid over the whole term.
    pub total_interest: Decimal,
    /// Everything paid back: principal plus interest.
    pub total_amount: Decimal,
}

impl AmortizationQuote {
    /// A quote with nothing owed beyond the principal.
    pub fn flat(principal: Decimal, annual_rate_percent: Decimal, term_months: Decimal) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_months,
            monthly_payment: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            total_amount: principal,
        }
    }

    /// Interest as a fraction of principal.
    pub fn interest_ratio(&self) -> f64 {
        if self.principal.is_zero() {
            return 0.0;
        }
        (self.total_interest / self.principal).to_f64().unwrap_or(0.0)
    }
}

impl fmt::Display for AmortizationQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Loan Calculator ===")?;
        writeln!(f, "Principal:       {}", format_currency(self.principal, true))?;
        writeln!(f, "Interest rate:   {}%", self.annual_rate_percent)?;
        writeln!(f, "Term:            {} months", self.term_months)?;
        writeln!(f, "Monthly payment: {}", format_currency(self.monthly_payment, true))?;
        writeln!(f, "Total interest:  {}", format_currency(self.total_interest, true))?;
        writeln!(f, "Total amount:    {}", format_currency(self.total_amount, true))
    }
}

/// Compute the totals for a loan.
///
/// When the payment formula is undefined the quote falls back to a zero
/// payment and zero interest instead of propagating a non-number.
///
/// # Examples
///
/// ```
/// use loan_desk::calculator::amortization::amortize;
/// use rust_decimal_macros::dec;
///
/// let quote = amortize(dec!(10000), dec!(13), dec!(12));
/// assert!(quote.total_interest > dec!(0));
/// assert_eq!(quote.total_amount, quote.principal + quote.total_interest);
///
/// let free = amortize(dec!(10000), dec!(0), dec!(12));
/// assert_eq!(free.total_interest, dec!(0));
/// ```
pub fn amortize(principal: Decimal, annual_rate_percent: Decimal, term_months: Decimal) -> AmortizationQuote {
    let Some(payment) = monthly_payment(principal, annual_rate_percent, term_months) else {
        log::debug!(
            "payment undefined for principal={} rate={} months={}; using zero",
            principal,
            annual_rate_percent,
            term_months
        );
        return AmortizationQuote::flat(principal, annual_rate_percent, term_months);
    };

    let repaid = payment * term_months;
    let total_interest = repaid - principal;

    AmortizationQuote {
        principal,
        annual_rate_percent,
        term_months,
        monthly_payment: payment,
        total_interest,
        total_amount: principal + total_interest,
    }
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    pub payment: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    /// Balance left after this month's payment.
    pub balance: Decimal,
}

/// Month-by-month breakdown of a fixed-payment loan.
///
/// Amounts are rounded to cents; the final row absorbs the rounding so the
/// balance ends at exactly zero. Empty when the payment is undefined.
pub fn amortization_schedule(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> Vec<ScheduleRow> {
    let Some(payment) = monthly_payment(principal, annual_rate_percent, Decimal::from(term_months))
    else {
        return Vec::new();
    };
    let payment = payment.round_dp(2);
    let r = monthly_rate(annual_rate_percent);

    let mut balance = principal;
    let mut rows = Vec::with_capacity(term_months as usize);
    for period in 1..=term_months {
        let interest = (balance * r).round_dp(2);
        let mut principal_part = payment - interest;
        if period == term_months || principal_part > balance {
            principal_part = balance;
        }
        balance -= principal_part;
        rows.push(ScheduleRow {
            period,
            payment: principal_part + interest,
            interest,
            principal: principal_part,
            balance,
        });
    }
    rows
}
