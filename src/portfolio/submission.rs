use crate::api::backend::{BackendError, LoanBackend};
use crate::api::rest::PaymentRequest;
use crate::core::loan::{LoanId, LoanSummary};
use crate::core::payment::Payment;
use crate::portfolio::book::LoanBook;
use crate::validation::transaction::{check_amount, check_date, validate_transaction, TransactionValidation};
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Why a payment could not be recorded.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("no loan selected")]
    NoLoanSelected,
    #[error("form is invalid: {}", .0.messages().join(", "))]
    Invalid(TransactionValidation),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// The "new transaction" form for one loan.
///
/// A failed submission leaves every field as typed and keeps the form
/// open, with the failure available from [`PaymentForm::last_error`], so the
/// user can retry. A successful one clears and closes the form.
#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
    loan_id: Option<LoanId>,
    loan_name: String,
    amount: String,
    date: String,
    open: bool,
    last_error: Option<String>,
}

impl PaymentForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the form for a loan, starting from empty fields.
    pub fn open_for(&mut self, loan: &LoanSummary) {
        self.loan_id = Some(loan.id().clone());
        self.loan_name = loan.loan().name().to_string();
        self.amount.clear();
        self.date.clear();
        self.last_error = None;
        self.open = true;
    }

    /// Close without submitting. Typed values are kept.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn title(&self) -> String {
        format!("New transaction for {}", self.loan_name)
    }

    pub fn loan_id(&self) -> Option<&LoanId> {
        self.loan_id.as_ref()
    }

    pub fn set_amount(&mut self, amount: &str) {
        self.amount = amount.to_string();
    }

    pub fn set_date(&mut self, date: &str) {
        self.date = date.to_string();
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn validation(&self, today: NaiveDate) -> TransactionValidation {
        validate_transaction(&self.amount, &self.date, today)
    }

    fn reset(&mut self) {
        self.amount.clear();
        self.date.clear();
        self.last_error = None;
        self.open = false;
    }

    /// Validate, record the payment, then refresh the loan list.
    ///
    /// `today` drives the future-date rule; `now` re-derives statuses after
    /// the refresh. A refresh failure after a successful write is logged and
    /// does not undo the submission. Nothing here guards against submitting
    /// twice.
    pub fn submit<B: LoanBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        book: &mut LoanBook,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Payment, SubmitError> {
        let loan_id = self.loan_id.clone().ok_or(SubmitError::NoLoanSelected)?;

        let (amount, date) = match (check_amount(&self.amount), check_date(&self.date, today)) {
            (Ok(amount), Ok(date)) => (amount, date),
            _ => return Err(SubmitError::Invalid(self.validation(today))),
        };

        let request = PaymentRequest::new(amount, date);
        let payment = match backend.record_payment(&loan_id, &request) {
            Ok(payment) => payment,
            Err(e) => {
                log::warn!("payment on loan {} failed: {}", loan_id, e);
                self.last_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        if let Err(e) = book.refresh(&*backend, now) {
            log::warn!("payment {} recorded but refresh failed: {}", payment.id(), e);
        }
        self.reset();
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::InMemoryBackend;
    use crate::core::loan::Loan;
    use crate::validation::transaction::TransactionError;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    fn setup() -> (InMemoryBackend, LoanBook, PaymentForm) {
        let backend = InMemoryBackend::new(vec![Loan::new(
            LoanId::new("1"),
            "Tom's Loan",
            dec!(10000),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            dec!(5),
        )]);
        let mut book = LoanBook::default();
        book.refresh(&backend, now()).unwrap();
        let mut form = PaymentForm::new();
        form.open_for(&book.loans()[0]);
        (backend, book, form)
    }

    #[test]
    fn test_successful_submit_refreshes_and_closes() {
        let (mut backend, mut book, mut form) = setup();
        assert_eq!(form.title(), "New transaction for Tom's Loan");
        form.set_amount("2500");
        form.set_date("2024-06-14");

        let payment = form.submit(&mut backend, &mut book, today(), now()).unwrap();
        assert_eq!(payment.amount(), Some(dec!(2500)));
        assert!(!form.is_open());
        assert_eq!(form.amount(), "");

        let summary = book.get(&LoanId::new("1")).unwrap();
        assert_eq!(summary.total_paid(), dec!(2500));
        assert_eq!(summary.status().as_str(), "On time");
    }

    #[test]
    fn test_invalid_form_is_not_sent() {
        let (mut backend, mut book, mut form) = setup();
        form.set_amount("0");
        form.set_date("2024-06-16");

        match form.submit(&mut backend, &mut book, today(), now()) {
            Err(SubmitError::Invalid(v)) => {
                assert_eq!(v.amount, Some(TransactionError::AmountNotPositive));
                assert_eq!(v.date, Some(TransactionError::DateInFuture));
            }
            other => panic!("expected invalid form, got {:?}", other),
        }
        assert!(backend.loans()[0].payments().is_empty());
        assert!(form.is_open());
    }

    #[test]
    fn test_backend_failure_keeps_input() {
        let (mut backend, mut book, mut form) = setup();
        form.set_amount("750");
        form.set_date("2024-06-01");
        backend.set_offline(true);

        let err = form.submit(&mut backend, &mut book, today(), now()).unwrap_err();
        assert!(matches!(err, SubmitError::Backend(BackendError::Unavailable(_))));
        assert!(form.is_open());
        assert_eq!(form.amount(), "750");
        assert_eq!(form.date(), "2024-06-01");
        assert!(form.last_error().unwrap().contains("unavailable"));

        backend.set_offline(false);
        form.submit(&mut backend, &mut book, today(), now()).unwrap();
        assert!(form.last_error().is_none());
    }

    #[test]
    fn test_submit_without_loan() {
        let (mut backend, mut book, _) = setup();
        let mut form = PaymentForm::new();
        form.set_amount("10");
        form.set_date("2024-06-01");
        assert!(matches!(
            form.submit(&mut backend, &mut book, today(), now()),
            Err(SubmitError::NoLoanSelected)
        ));
    }
}
