use crate::api::graphql::LoanFilter;
use crate::api::rest::PaymentRequest;
use crate::core::loan::{Loan, LoanId};
use crate::core::payment::Payment;
use thiserror::Error;

/// Failures talking to the loan backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Loan with ID {0} not found")]
    LoanNotFound(LoanId),
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("query failed: {}", .0.join("; "))]
    Graphql(Vec<String>),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("malformed data in {context}: {reason}")]
    Malformed { context: String, reason: String },
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The two operations the loan desk needs from its backend.
///
/// Implementations own transport and storage; callers only see loans and
/// payments. Neither operation retries.
pub trait LoanBackend {
    /// Fetch loans matching `filter`, with their payment history.
    fn fetch_loans(&self, filter: &LoanFilter) -> Result<Vec<Loan>, BackendError>;

    /// Record one repayment and return it as stored.
    fn record_payment(
        &mut self,
        loan_id: &LoanId,
        request: &PaymentRequest,
    ) -> Result<Payment, BackendError>;
}
