//! # loan-desk
//!
//! Loan status resolution, repayment recording and amortization.
//!
//! Given the loans and payment histories served by a lending backend, this
//! crate derives each loan's repayment status, validates and records new
//! repayments, and quotes fixed-payment loans.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: loans, payments, status resolution
//! - **calculator** — Amortization formula and calculator session state
//! - **validation** — Calculator and record-payment form rules
//! - **api** — Backend contracts: fetch-loans query, record-payment command
//! - **portfolio** — Loan list, search debounce, payment submission
//! - **simulation** — Random sample portfolios

pub mod api;
pub mod calculator;
pub mod config;
pub mod core;
pub mod format;
pub mod portfolio;
pub mod simulation;
pub mod validation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::api::backend::{BackendError, LoanBackend};
    pub use crate::api::graphql::LoanFilter;
    pub use crate::api::memory::InMemoryBackend;
    pub use crate::calculator::amortization::{amortize, AmortizationQuote};
    pub use crate::calculator::session::CalculatorSession;
    pub use crate::config::DeskConfig;
    pub use crate::core::loan::{Loan, LoanId, LoanSummary};
    pub use crate::core::payment::{Payment, PaymentId};
    pub use crate::core::status::{resolve_status, LoanStatus, PaymentStatus, StatusThresholds};
    pub use crate::portfolio::book::LoanBook;
    pub use crate::portfolio::submission::{PaymentForm, SubmitError};
    pub use crate::validation::{validate_calculator, validate_transaction};
}
