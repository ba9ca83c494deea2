use crate::calculator::amortization::{amortize, AmortizationQuote};
use crate::validation::calculator::{validate_calculator, CalculatorField, CalculatorValidation};
use crate::validation::parse_number;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Rate used when the rate field is left empty, in percent.
pub const DEFAULT_RATE_PERCENT: Decimal = dec!(13);
/// Term used when the months field is left empty.
pub const DEFAULT_TERM_MONTHS: Decimal = dec!(12);

/// State of one loan-calculator session.
///
/// Holds the raw field text exactly as typed. Every edit re-runs validation
/// and, when the form is valid, recomputes the quote; an invalid form
/// resets the result to zero. Nothing outlives the session.
///
/// # Examples
///
/// ```
/// use loan_desk::calculator::session::CalculatorSession;
/// use rust_decimal_macros::dec;
///
/// let mut session = CalculatorSession::new();
/// session.set_principal("10000");
/// assert!(session.total_interest() > dec!(0));
///
/// session.set_rate("150");
/// assert!(!session.is_valid());
/// assert_eq!(session.total_interest(), dec!(0));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CalculatorSession {
    principal: String,
    rate: String,
    months: String,
    validation: CalculatorValidation,
    quote: Option<AmortizationQuote>,
}

impl Default for CalculatorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorSession {
    /// A fresh session: empty principal, 13% over 12 months.
    pub fn new() -> Self {
        Self::with_inputs("", "13", "12")
    }

    pub fn with_inputs(principal: &str, rate: &str, months: &str) -> Self {
        let mut session = Self {
            principal: principal.to_string(),
            rate: rate.to_string(),
            months: months.to_string(),
            validation: CalculatorValidation::default(),
            quote: None,
        };
        session.recompute();
        session
    }

    pub fn set_principal(&mut self, value: &str) {
        self.principal = value.to_string();
        self.recompute();
    }

    pub fn set_rate(&mut self, value: &str) {
        self.rate = value.to_string();
        self.recompute();
    }

    pub fn set_months(&mut self, value: &str) {
        self.months = value.to_string();
        self.recompute();
    }

    pub fn set_field(&mut self, field: CalculatorField, value: &str) {
        match field {
            CalculatorField::Principal => self.set_principal(value),
            CalculatorField::Rate => self.set_rate(value),
            CalculatorField::Months => self.set_months(value),
        }
    }

    fn recompute(&mut self) {
        self.validation = validate_calculator(&self.principal, &self.rate, &self.months);
        self.quote = if self.validation.is_valid() {
            Some(amortize(
                self.principal_or_zero(),
                parse_number(&self.rate).unwrap_or(DEFAULT_RATE_PERCENT),
                parse_number(&self.months).unwrap_or(DEFAULT_TERM_MONTHS),
            ))
        } else {
            None
        };
        log::debug!(
            "calculator recomputed: valid={} interest={}",
            self.validation.is_valid(),
            self.total_interest()
        );
    }

    fn principal_or_zero(&self) -> Decimal {
        parse_number(&self.principal).unwrap_or(Decimal::ZERO)
    }

    pub fn validation(&self) -> &CalculatorValidation {
        &self.validation
    }

    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }

    /// The full quote, present only while the form is valid.
    pub fn quote(&self) -> Option<&AmortizationQuote> {
        self.quote.as_ref()
    }

    /// Total interest over the term; zero while the form is invalid.
    pub fn total_interest(&self) -> Decimal {
        self.quote.map(|q| q.total_interest).unwrap_or(Decimal::ZERO)
    }

    /// Principal as typed plus total interest.
    pub fn total_amount(&self) -> Decimal {
        self.principal_or_zero() + self.total_interest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::calculator::CalculatorError;

    #[test]
    fn test_new_session_is_valid_and_zero() {
        let session = CalculatorSession::new();
        assert!(session.is_valid());
        assert_eq!(session.total_interest(), Decimal::ZERO);
        assert_eq!(session.total_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_total_amount_matches_quote() {
        let session = CalculatorSession::with_inputs("10000", "13", "12");
        let quote = session.quote().unwrap();
        assert_eq!(session.total_amount(), quote.total_amount);
        assert_eq!(session.total_amount(), dec!(10000) + session.total_interest());
    }

    #[test]
    fn test_invalid_resets_result() {
        let mut session = CalculatorSession::with_inputs("10000", "13", "12");
        assert!(session.total_interest() > Decimal::ZERO);

        session.set_months("0");
        assert!(!session.is_valid());
        assert_eq!(session.total_interest(), Decimal::ZERO);
        assert!(session.quote().is_none());
        assert_eq!(
            session.validation().months,
            Some(CalculatorError::MonthsNotPositive)
        );
        // Displayed total still shows the typed principal.
        assert_eq!(session.total_amount(), dec!(10000));
    }

    #[test]
    fn test_zero_rate_gives_zero_interest() {
        let session = CalculatorSession::with_inputs("10000", "0", "12");
        assert_eq!(session.total_interest(), Decimal::ZERO);
    }

    #[test]
    fn test_empty_fields_use_defaults() {
        let defaulted = CalculatorSession::with_inputs("5000", "", "");
        let explicit = CalculatorSession::with_inputs("5000", "13", "12");
        assert_eq!(defaulted.total_interest(), explicit.total_interest());
    }

    #[test]
    fn test_set_field_dispatch() {
        let mut session = CalculatorSession::new();
        session.set_field(CalculatorField::Principal, "abc");
        assert_eq!(
            session.validation().principal,
            Some(CalculatorError::PrincipalNotANumber)
        );
    }
}
