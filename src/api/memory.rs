use crate::api::backend::{BackendError, LoanBackend};
use crate::api::graphql::{loans_response, parse_loans_response, LoanFilter};
use crate::api::rest::PaymentRequest;
use crate::core::loan::{Loan, LoanId};
use crate::core::payment::{Payment, PaymentId};
use rust_decimal::Decimal;

/// A backend held entirely in memory.
///
/// Applies the same rules as the production backend: name filters match
/// case-insensitively on a substring, amount filters match the principal
/// exactly, and new payment IDs continue from the highest numeric ID seen.
///
/// # Examples
///
/// ```
/// use loan_desk::api::backend::LoanBackend;
/// use loan_desk::api::graphql::LoanFilter;
/// use loan_desk::api::memory::InMemoryBackend;
/// use loan_desk::core::loan::{Loan, LoanId};
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let due = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let backend = InMemoryBackend::new(vec![
///     Loan::new(LoanId::new("1"), "Tom's Loan", dec!(10000), due, dec!(5)),
///     Loan::new(LoanId::new("2"), "Chris Wailaka", dec!(3500), due, dec!(3.5)),
/// ]);
///
/// let found = backend.fetch_loans(&LoanFilter::by_name("TOM")).unwrap();
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    loans: Vec<Loan>,
    next_payment_id: u64,
    offline: bool,
}

impl InMemoryBackend {
    pub fn new(loans: Vec<Loan>) -> Self {
        let highest = loans
            .iter()
            .flat_map(|l| l.payments())
            .filter_map(|p| p.id().as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            loans,
            next_payment_id: highest + 1,
            offline: false,
        }
    }

    /// Load from a fetch-loans response snapshot.
    pub fn from_snapshot(json: &str) -> Result<Self, BackendError> {
        Ok(Self::new(parse_loans_response(json)?))
    }

    /// Render the current state as a fetch-loans response snapshot.
    pub fn to_snapshot(&self) -> Result<String, BackendError> {
        Ok(serde_json::to_string_pretty(&loans_response(&self.loans))?)
    }

    /// While offline every call fails with [`BackendError::Unavailable`].
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    fn ensure_online(&self) -> Result<(), BackendError> {
        if self.offline {
            return Err(BackendError::Unavailable("backend is offline".to_string()));
        }
        Ok(())
    }
}

fn matches(loan: &Loan, filter: &LoanFilter) -> bool {
    if let Some(name) = filter.name.as_deref().filter(|n| !n.is_empty()) {
        if !loan.name().to_lowercase().contains(&name.to_lowercase()) {
            return false;
        }
    }
    // Zero means "no amount filter", matching the production backend.
    if let Some(amount) = filter.amount.filter(|a| *a != 0) {
        if loan.principal() != Decimal::from(amount) {
            return false;
        }
    }
    true
}

impl LoanBackend for InMemoryBackend {
    fn fetch_loans(&self, filter: &LoanFilter) -> Result<Vec<Loan>, BackendError> {
        self.ensure_online()?;
        let found: Vec<Loan> = self
            .loans
            .iter()
            .filter(|loan| matches(loan, filter))
            .cloned()
            .collect();
        log::debug!("fetch_loans {:?} -> {} loans", filter, found.len());
        Ok(found)
    }

    fn record_payment(
        &mut self,
        loan_id: &LoanId,
        request: &PaymentRequest,
    ) -> Result<Payment, BackendError> {
        self.ensure_online()?;
        let loan = self
            .loans
            .iter_mut()
            .find(|l| l.id() == loan_id)
            .ok_or_else(|| BackendError::LoanNotFound(loan_id.clone()))?;

        if request.amount <= Decimal::ZERO {
            return Err(BackendError::Rejected {
                status: 400,
                message: "Amount must be greater than 0".to_string(),
            });
        }

        let payment = Payment::new(
            PaymentId::new(self.next_payment_id.to_string()),
            loan_id.clone(),
            request.amount,
            request.date,
        );
        self.next_payment_id += 1;
        loan.add_payment(payment.clone());

        log::info!(
            "recorded payment {} of {} on loan {} dated {}",
            payment.id(),
            request.amount,
            loan_id,
            request.date
        );
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn backend() -> InMemoryBackend {
        let due = date(2025, 3, 1);
        let tom = LoanId::new("1");
        InMemoryBackend::new(vec![
            Loan::new(tom.clone(), "Tom's Loan", dec!(10000), due, dec!(5)).with_payments(vec![
                Payment::new("1", tom.clone(), dec!(5000), date(2024, 3, 4)),
                Payment::new("7", tom, dec!(1000), date(2024, 4, 4)),
            ]),
            Loan::new(LoanId::new("2"), "Chris Wailaka", dec!(3500), due, dec!(3.5)),
            Loan::new(LoanId::new("3"), "NP Mobile Money", dec!(500000), due, dec!(4.5)),
        ])
    }

    #[test]
    fn test_fetch_without_filter() {
        let loans = backend().fetch_loans(&LoanFilter::default()).unwrap();
        assert_eq!(loans.len(), 3);
    }

    #[test]
    fn test_fetch_by_name_case_insensitive() {
        let loans = backend().fetch_loans(&LoanFilter::by_name("mobile")).unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].id().as_str(), "3");
    }

    #[test]
    fn test_empty_name_matches_all() {
        let loans = backend().fetch_loans(&LoanFilter::by_name("")).unwrap();
        assert_eq!(loans.len(), 3);
    }

    #[test]
    fn test_fetch_by_amount() {
        let filter = LoanFilter::default().with_amount(3500);
        let loans = backend().fetch_loans(&filter).unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].name(), "Chris Wailaka");
    }

    #[test]
    fn test_record_payment_assigns_next_id() {
        let mut backend = backend();
        let request = PaymentRequest::new(dec!(250), date(2024, 5, 1));
        let payment = backend.record_payment(&LoanId::new("2"), &request).unwrap();
        assert_eq!(payment.id().as_str(), "8");
        assert_eq!(backend.loans()[1].payments().len(), 1);

        let second = backend.record_payment(&LoanId::new("2"), &request).unwrap();
        assert_eq!(second.id().as_str(), "9");
    }

    #[test]
    fn test_record_payment_unknown_loan() {
        let mut backend = backend();
        let request = PaymentRequest::new(dec!(250), date(2024, 5, 1));
        let err = backend.record_payment(&LoanId::new("99"), &request).unwrap_err();
        assert!(matches!(err, BackendError::LoanNotFound(_)));
        assert_eq!(err.to_string(), "Loan with ID 99 not found");
    }

    #[test]
    fn test_record_payment_rejects_non_positive() {
        let mut backend = backend();
        let request = PaymentRequest::new(dec!(0), date(2024, 5, 1));
        let err = backend.record_payment(&LoanId::new("1"), &request).unwrap_err();
        assert!(matches!(err, BackendError::Rejected { status: 400, .. }));
    }

    #[test]
    fn test_offline_fails() {
        let mut backend = backend();
        backend.set_offline(true);
        assert!(matches!(
            backend.fetch_loans(&LoanFilter::default()),
            Err(BackendError::Unavailable(_))
        ));
    }

    #[test]
    fn test_snapshot_round_trip_keeps_loans() {
        let original = backend();
        let restored = InMemoryBackend::from_snapshot(&original.to_snapshot().unwrap()).unwrap();
        assert_eq!(restored.loans().len(), 3);
        assert_eq!(restored.loans()[0].payments().len(), 2);
        assert_eq!(restored.loans()[2].principal(), dec!(500000));
    }
}
