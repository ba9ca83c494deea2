use super::{read_number, NumberInput};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

/// Largest principal the calculator accepts.
pub const MAX_PRINCIPAL: Decimal = dec!(1_000_000);
/// Largest annual rate, in percent.
pub const MAX_RATE_PERCENT: Decimal = dec!(100);
/// Longest term, in months (30 years).
pub const MAX_TERM_MONTHS: Decimal = dec!(360);

/// The calculator's input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculatorField {
    Principal,
    Rate,
    Months,
}

/// A problem with one calculator field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum CalculatorError {
    #[error("Principal must be a valid number")]
    PrincipalNotANumber,
    #[error("Principal must be greater than 0")]
    PrincipalNotPositive,
    #[error("Principal cannot exceed 1,000,000")]
    PrincipalTooLarge,
    #[error("Rate must be a valid number")]
    RateNotANumber,
    #[error("Rate must be greater than 0")]
    RateNotPositive,
    #[error("Rate cannot exceed 100%")]
    RateTooLarge,
    #[error("Months must be a valid number")]
    MonthsNotANumber,
    #[error("Months must be greater than 0")]
    MonthsNotPositive,
    #[error("Loan term cannot exceed 30 years (360 months)")]
    TermTooLong,
}

impl CalculatorError {
    pub fn field(&self) -> CalculatorField {
        use CalculatorError::*;
        match self {
            PrincipalNotANumber | PrincipalNotPositive | PrincipalTooLarge => {
                CalculatorField::Principal
            }
            RateNotANumber | RateNotPositive | RateTooLarge => CalculatorField::Rate,
            MonthsNotANumber | MonthsNotPositive | TermTooLong => CalculatorField::Months,
        }
    }
}

/// Per-field outcome of validating the calculator form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CalculatorValidation {
    pub principal: Option<CalculatorError>,
    pub rate: Option<CalculatorError>,
    pub months: Option<CalculatorError>,
}

impl CalculatorValidation {
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn error_for(&self, field: CalculatorField) -> Option<CalculatorError> {
        match field {
            CalculatorField::Principal => self.principal,
            CalculatorField::Rate => self.rate,
            CalculatorField::Months => self.months,
        }
    }

    /// Errors present, in field order.
    pub fn errors(&self) -> Vec<CalculatorError> {
        [self.principal, self.rate, self.months]
            .into_iter()
            .flatten()
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors().iter().map(ToString::to_string).collect()
    }
}

struct Rule {
    not_a_number: CalculatorError,
    not_positive: CalculatorError,
    too_large: CalculatorError,
    max: Decimal,
}

fn check(input: &str, rule: Rule) -> Option<CalculatorError> {
    if input.is_empty() {
        return None;
    }
    match read_number(input) {
        None => Some(rule.not_a_number),
        Some(NumberInput::BelowRange) => Some(rule.not_positive),
        Some(NumberInput::AboveRange) => Some(rule.too_large),
        Some(NumberInput::Exact(v)) if v <= Decimal::ZERO => Some(rule.not_positive),
        Some(NumberInput::Exact(v)) if v > rule.max => Some(rule.too_large),
        Some(NumberInput::Exact(_)) => None,
    }
}

/// Validate the three calculator fields independently.
///
/// An empty field is not an error; it simply contributes nothing. A field
/// holding only whitespace is not empty and reads as not a number.
///
/// # Examples
///
/// ```
/// use loan_desk::validation::validate_calculator;
///
/// let result = validate_calculator("-1000", "13", "12");
/// assert!(!result.is_valid());
/// assert_eq!(result.messages(), vec!["Principal must be greater than 0"]);
/// ```
pub fn validate_calculator(principal: &str, rate: &str, months: &str) -> CalculatorValidation {
    CalculatorValidation {
        principal: check(
            principal,
            Rule {
                not_a_number: CalculatorError::PrincipalNotANumber,
                not_positive: CalculatorError::PrincipalNotPositive,
                too_large: CalculatorError::PrincipalTooLarge,
                max: MAX_PRINCIPAL,
            },
        ),
        rate: check(
            rate,
            Rule {
                not_a_number: CalculatorError::RateNotANumber,
                not_positive: CalculatorError::RateNotPositive,
                too_large: CalculatorError::RateTooLarge,
                max: MAX_RATE_PERCENT,
            },
        ),
        months: check(
            months,
            Rule {
                not_a_number: CalculatorError::MonthsNotANumber,
                not_positive: CalculatorError::MonthsNotPositive,
                too_large: CalculatorError::TermTooLong,
                max: MAX_TERM_MONTHS,
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_calculator("", "13", "12").is_valid());
        assert!(validate_calculator("10000", "13", "12").is_valid());
    }

    #[test]
    fn test_empty_fields_pass() {
        let result = validate_calculator("", "", "");
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_principal_rules() {
        assert_eq!(
            validate_calculator("abc", "", "").principal,
            Some(CalculatorError::PrincipalNotANumber)
        );
        assert_eq!(
            validate_calculator("-1000", "", "").principal,
            Some(CalculatorError::PrincipalNotPositive)
        );
        assert_eq!(
            validate_calculator("0", "", "").principal,
            Some(CalculatorError::PrincipalNotPositive)
        );
        assert_eq!(
            validate_calculator("1000001", "", "").principal,
            Some(CalculatorError::PrincipalTooLarge)
        );
        assert_eq!(validate_calculator("1000000", "", "").principal, None);
    }

    #[test]
    fn test_out_of_range_principal() {
        for input in ["1e30", "1e400", "Infinity", "1000000000000000000000000000000000000000"] {
            assert_eq!(
                validate_calculator(input, "", "").principal,
                Some(CalculatorError::PrincipalTooLarge),
                "principal {:?}",
                input
            );
        }
        assert_eq!(
            validate_calculator("-1e30", "", "").principal,
            Some(CalculatorError::PrincipalNotPositive)
        );
        assert_eq!(
            validate_calculator("", "", "1e30").months,
            Some(CalculatorError::TermTooLong)
        );
    }

    #[test]
    fn test_whitespace_is_not_empty() {
        let result = validate_calculator("  ", "", "");
        assert_eq!(result.principal, Some(CalculatorError::PrincipalNotANumber));
        assert_eq!(
            validate_calculator("", " ", "").rate,
            Some(CalculatorError::RateNotANumber)
        );
    }

    #[test]
    fn test_rate_rules() {
        let result = validate_calculator("", "150", "");
        assert_eq!(result.rate, Some(CalculatorError::RateTooLarge));
        assert_eq!(result.messages(), vec!["Rate cannot exceed 100%"]);
        assert_eq!(
            validate_calculator("", "0", "").rate,
            Some(CalculatorError::RateNotPositive)
        );
        assert_eq!(validate_calculator("", "100", "").rate, None);
    }

    #[test]
    fn test_months_rules() {
        let result = validate_calculator("", "", "0");
        assert_eq!(result.months, Some(CalculatorError::MonthsNotPositive));
        assert_eq!(result.messages(), vec!["Months must be greater than 0"]);
        assert_eq!(
            validate_calculator("", "", "361").months,
            Some(CalculatorError::TermTooLong)
        );
        assert_eq!(
            validate_calculator("", "", "twelve").months,
            Some(CalculatorError::MonthsNotANumber)
        );
    }

    #[test]
    fn test_all_three_errors_together() {
        let result = validate_calculator("-1000", "150", "0");
        assert!(!result.is_valid());
        assert_eq!(
            result.messages(),
            vec![
                "Principal must be greater than 0",
                "Rate cannot exceed 100%",
                "Months must be greater than 0",
            ]
        );
    }

    #[test]
    fn test_error_fields() {
        assert_eq!(CalculatorError::TermTooLong.field(), CalculatorField::Months);
        let result = validate_calculator("x", "", "");
        assert_eq!(
            result.error_for(CalculatorField::Principal),
            Some(CalculatorError::PrincipalNotANumber)
        );
        assert_eq!(result.error_for(CalculatorField::Rate), None);
    }
}
