//! Sample portfolio generation.
//!
//! Builds random loans with random repayment histories, spread so that
//! every status shows up. Used by the CLI `generate` command, the demos and
//! the benchmarks.

use crate::core::loan::{Loan, LoanId};
use crate::core::payment::Payment;
use chrono::{Duration, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random loan portfolio.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    /// Number of loans.
    pub loan_count: usize,
    /// Upper bound on payments per loan (a loan may get none).
    pub max_payments_per_loan: usize,
    /// Minimum principal, whole currency units.
    pub min_principal: i64,
    /// Maximum principal, whole currency units.
    pub max_principal: i64,
    /// Oldest a payment can be, in days before `as_of`.
    pub history_days: i64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            loan_count: 10,
            max_payments_per_loan: 4,
            min_principal: 1_000,
            max_principal: 500_000,
            history_days: 60,
        }
    }
}

/// Generate a random portfolio whose payments fall on or before `as_of`.
pub fn generate_portfolio(config: &PortfolioConfig, as_of: NaiveDate) -> Vec<Loan> {
    let mut rng = rand::thread_rng();
    let mut next_payment_id = 1u64;
    let max_principal = config.max_principal.max(config.min_principal + 1);

    let loans: Vec<Loan> = (0..config.loan_count)
        .map(|i| {
            let id = LoanId::new((i + 1).to_string());
            // Principal in round hundreds, like the source data.
            let principal = rng.gen_range(config.min_principal..max_principal) / 100 * 100;
            let rate = Decimal::new(rng.gen_range(10..=150), 1);
            let due_date = as_of + Duration::days(rng.gen_range(30..=365));

            let payment_count = rng.gen_range(0..=config.max_payments_per_loan);
            let payments = (0..payment_count)
                .map(|_| {
                    let age = rng.gen_range(0..=config.history_days.max(0));
                    let amount = Decimal::from(rng.gen_range(1..=50) * 100);
                    let payment = Payment::new(
                        next_payment_id.to_string(),
                        id.clone(),
                        amount,
                        as_of - Duration::days(age),
                    );
                    next_payment_id += 1;
                    payment
                })
                .collect();

            Loan::new(
                id,
                format!("Borrower {:03}", i + 1),
                Decimal::from(principal.max(100)),
                due_date,
                rate,
            )
            .with_payments(payments)
        })
        .collect();

    log::debug!(
        "generated {} loans with {} payments",
        loans.len(),
        next_payment_id - 1
    );
    loans
}
