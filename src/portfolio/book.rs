use crate::api::backend::{BackendError, LoanBackend};
use crate::api::graphql::LoanFilter;
use crate::core::loan::{LoanId, LoanSummary};
use crate::core::status::{LoanStatus, StatusThresholds};
use crate::format::format_currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

/// The loan list as a front end holds it.
///
/// Owns the current filter, the evaluated loans and the selected loan.
/// Loans are only replaced wholesale by [`LoanBook::refresh`], so the
/// derived status fields always match the payments they came from.
#[derive(Debug, Clone, Default)]
pub struct LoanBook {
    summaries: Vec<LoanSummary>,
    selected: Option<LoanId>,
    filter: LoanFilter,
    thresholds: StatusThresholds,
}

impl LoanBook {
    pub fn new(thresholds: StatusThresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }

    pub fn filter(&self) -> &LoanFilter {
        &self.filter
    }

    /// Replace the filter. Takes effect on the next refresh.
    pub fn set_filter(&mut self, filter: LoanFilter) {
        self.filter = filter;
    }

    /// Re-query the backend and re-derive every loan's status.
    ///
    /// On failure the previous list is kept untouched.
    pub fn refresh<B: LoanBackend + ?Sized>(
        &mut self,
        backend: &B,
        now: DateTime<Utc>,
    ) -> Result<usize, BackendError> {
        let loans = backend.fetch_loans(&self.filter).map_err(|e| {
            log::warn!("loan refresh failed: {}", e);
            e
        })?;
        self.summaries = loans
            .into_iter()
            .map(|loan| LoanSummary::evaluate(loan, now, &self.thresholds))
            .collect();

        if let Some(id) = &self.selected {
            if self.get(id).is_none() {
                log::debug!("selected loan {} left the list", id);
                self.selected = None;
            }
        }

        log::info!("loaded {} loans", self.summaries.len());
        Ok(self.summaries.len())
    }

    pub fn loans(&self) -> &[LoanSummary] {
        &self.summaries
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn get(&self, id: &LoanId) -> Option<&LoanSummary> {
        self.summaries.iter().find(|s| s.id() == id)
    }

    /// Select a loan in the list. Returns false if it is not listed.
    pub fn select(&mut self, id: &LoanId) -> bool {
        if self.get(id).is_some() {
            self.selected = Some(id.clone());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&LoanSummary> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// Number of loans in each status.
    pub fn status_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for summary in &self.summaries {
            *counts.entry(summary.status().as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn loans_with_status(&self, status: LoanStatus) -> impl Iterator<Item = &LoanSummary> {
        self.summaries.iter().filter(move |s| s.status() == status)
    }

    pub fn total_principal(&self) -> Decimal {
        self.summaries.iter().map(|s| s.loan().principal()).sum()
    }

    pub fn total_paid(&self) -> Decimal {
        self.summaries.iter().map(|s| s.total_paid()).sum()
    }
}

impl fmt::Display for LoanBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Loans ({}) ===", self.summaries.len())?;
        for summary in &self.summaries {
            write!(f, "{}", summary)?;
        }
        writeln!(f)?;
        writeln!(f, "Total principal: {}", format_currency(self.total_principal(), false))?;
        writeln!(f, "Total paid:      {}", format_currency(self.total_paid(), false))?;
        for (status, count) in self.status_counts() {
            writeln!(f, "  {:<10} {}", status, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::InMemoryBackend;
    use crate::core::loan::Loan;
    use crate::core::payment::Payment;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn backend() -> InMemoryBackend {
        let due = date(2025, 3, 1);
        let a = LoanId::new("1");
        let b = LoanId::new("2");
        InMemoryBackend::new(vec![
            Loan::new(a.clone(), "Tom's Loan", dec!(10000), due, dec!(5))
                .with_payments(vec![Payment::new("1", a, dec!(500), date(2024, 4, 8))]),
            Loan::new(b.clone(), "Chris Wailaka", dec!(3500), due, dec!(3.5))
                .with_payments(vec![Payment::new("2", b, dec!(300), date(2024, 2, 1))]),
            Loan::new(LoanId::new("3"), "NP Mobile Money", dec!(500000), due, dec!(4.5)),
        ])
    }

    #[test]
    fn test_refresh_derives_status() {
        let mut book = LoanBook::default();
        assert_eq!(book.refresh(&backend(), now()).unwrap(), 3);
        assert_eq!(book.get(&LoanId::new("1")).unwrap().status(), LoanStatus::OnTime);
        assert_eq!(book.get(&LoanId::new("2")).unwrap().status(), LoanStatus::Defaulted);
        assert_eq!(book.get(&LoanId::new("3")).unwrap().status(), LoanStatus::Unpaid);
        assert_eq!(book.total_paid(), dec!(800));
        assert_eq!(book.status_counts().get("Unpaid"), Some(&1));
        assert_eq!(book.loans_with_status(LoanStatus::Defaulted).count(), 1);
    }

    #[test]
    fn test_failed_refresh_keeps_list() {
        let mut backend = backend();
        let mut book = LoanBook::default();
        book.refresh(&backend, now()).unwrap();

        backend.set_offline(true);
        assert!(book.refresh(&backend, now()).is_err());
        assert_eq!(book.len(), 3);
    }

    #[test]
    fn test_selection_dropped_when_filtered_out() {
        let backend = backend();
        let mut book = LoanBook::default();
        book.refresh(&backend, now()).unwrap();
        assert!(book.select(&LoanId::new("2")));
        assert_eq!(book.selected().unwrap().loan().name(), "Chris Wailaka");

        book.set_filter(LoanFilter::by_name("tom"));
        book.refresh(&backend, now()).unwrap();
        assert_eq!(book.len(), 1);
        assert!(book.selected().is_none());
    }

    #[test]
    fn test_select_unknown_loan() {
        let mut book = LoanBook::default();
        book.refresh(&backend(), now()).unwrap();
        assert!(!book.select(&LoanId::new("42")));
        assert!(book.selected().is_none());
    }
}
