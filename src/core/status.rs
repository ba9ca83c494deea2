//! Loan status resolution.
//!
//! A loan's display status is derived from nothing but its payment history
//! and the instant of evaluation. The thresholds are counted in whole days
//! since the most recent payment:
//!
//! | days since payment | status      |
//! |--------------------|-------------|
//! | no payments        | Unpaid      |
//! | `< 6`              | On time     |
//! | `6..=30`           | Late        |
//! | `> 30`             | Defaulted   |
//!
//! Days overdue start accruing only after a 7-day grace window, so a loan
//! 6 or 7 days past its last payment reads "Late" with zero days overdue.

use crate::core::payment::{latest_payment_date, total_paid, Payment};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Display status of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    #[serde(rename = "On time")]
    OnTime,
    Late,
    Defaulted,
    Unpaid,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::OnTime => "On time",
            LoanStatus::Late => "Late",
            LoanStatus::Defaulted => "Defaulted",
            LoanStatus::Unpaid => "Unpaid",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day thresholds used by [`resolve_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusThresholds {
    /// A loan is on time while fewer than this many days have passed.
    pub on_time_within_days: i64,
    /// A loan defaults once more than this many days have passed.
    pub defaulted_after_days: i64,
    /// Days overdue count only past this grace window.
    pub grace_days: i64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            on_time_within_days: 6,
            defaulted_after_days: 30,
            grace_days: 7,
        }
    }
}

/// Derived payment information for one loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub status: LoanStatus,
    pub days_overdue: u32,
    pub total_paid: Decimal,
}

impl PaymentStatus {
    pub fn unpaid() -> Self {
        Self {
            status: LoanStatus::Unpaid,
            days_overdue: 0,
            total_paid: Decimal::ZERO,
        }
    }
}

/// Whole days elapsed between `date` (taken as UTC midnight) and `now`.
///
/// Floors toward negative infinity, so a payment dated in the future
/// yields a negative count.
pub fn days_since(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    (now - start).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Classify a loan from its payments.
///
/// Pure: the same payments and instant always give the same result, and
/// payment order does not matter.
pub fn resolve_status(
    payments: &[Payment],
    now: DateTime<Utc>,
    thresholds: &StatusThresholds,
) -> PaymentStatus {
    if payments.is_empty() {
        return PaymentStatus::unpaid();
    }

    let total_paid = total_paid(payments);

    let Some(latest) = latest_payment_date(payments) else {
        log::warn!(
            "none of {} payments carries a valid date; treating loan as unpaid",
            payments.len()
        );
        return PaymentStatus {
            total_paid,
            ..PaymentStatus::unpaid()
        };
    };

    let days = days_since(latest, now);
    let overdue = (days - thresholds.grace_days).max(0);
    let days_overdue = u32::try_from(overdue).unwrap_or(u32::MAX);

    let status = if days < thresholds.on_time_within_days {
        LoanStatus::OnTime
    } else if days > thresholds.defaulted_after_days {
        LoanStatus::Defaulted
    } else {
        LoanStatus::Late
    };

    log::debug!(
        "latest payment {} is {} days old: {} ({} overdue)",
        latest,
        days,
        status,
        days_overdue
    );

    PaymentStatus {
        status,
        days_overdue,
        total_paid,
    }
}
