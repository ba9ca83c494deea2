//! Form validation.
//!
//! One module serves both forms: the amortization calculator
//! ([`validate_calculator`]) and the record-payment form
//! ([`validate_transaction`]). Errors are field-scoped values whose
//! `Display` is the message shown next to the field. Validation never
//! fails; it only reports.

pub mod calculator;
pub mod transaction;

pub use calculator::{validate_calculator, CalculatorError, CalculatorField, CalculatorValidation};
pub use transaction::{validate_transaction, TransactionError, TransactionField, TransactionValidation};

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Magnitude past which a number no longer fits in a `Decimal`.
const DECIMAL_LIMIT: f64 = 7.9e28;
/// Magnitude below which a number has more places than a `Decimal` keeps.
const DECIMAL_EPSILON: f64 = 1e-28;

/// A user-entered number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberInput {
    /// Representable as a `Decimal`.
    Exact(Decimal),
    /// A number too large for a `Decimal`, infinity included.
    AboveRange,
    /// A number too negative for a `Decimal`, negative infinity included.
    BelowRange,
}

/// Read a user-entered number, keeping track of values out of `Decimal` range.
///
/// Accepts plain decimals (`"1500"`, `"-3.25"`, `".5"`), scientific
/// notation (`"1e5"`) and infinity. Surrounding whitespace is ignored;
/// anything else, `NaN` included, is rejected. Nonzero values smaller than
/// a `Decimal` can hold keep their sign at the smallest representable step.
pub fn read_number(input: &str) -> Option<NumberInput> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = Decimal::from_str(trimmed) {
        return Some(NumberInput::Exact(value));
    }

    let float = trimmed.parse::<f64>().ok().filter(|f| !f.is_nan())?;
    if float.abs() >= DECIMAL_LIMIT {
        return Some(if float > 0.0 {
            NumberInput::AboveRange
        } else {
            NumberInput::BelowRange
        });
    }
    if float.abs() < DECIMAL_EPSILON {
        let step = Decimal::new(1, 28);
        let value = if float > 0.0 {
            step
        } else if float < 0.0 {
            -step
        } else {
            Decimal::ZERO
        };
        return Some(NumberInput::Exact(value));
    }

    Decimal::from_scientific(trimmed)
        .ok()
        .or_else(|| Decimal::from_f64(float))
        .map(NumberInput::Exact)
}

/// Parse a user-entered number that fits in a `Decimal`.
///
/// Out-of-range numbers read as `None`; use [`read_number`] to tell them
/// apart from text that is not a number.
pub fn parse_number(input: &str) -> Option<Decimal> {
    match read_number(input)? {
        NumberInput::Exact(value) => Some(value),
        NumberInput::AboveRange | NumberInput::BelowRange => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1500"), Some(dec!(1500)));
        assert_eq!(parse_number("  -3.25 "), Some(dec!(-3.25)));
        assert_eq!(parse_number("1e3"), Some(dec!(1000)));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("12 months"), None);
        assert_eq!(parse_number("1e30"), None);
    }

    #[test]
    fn test_read_out_of_range() {
        assert_eq!(read_number("1e30"), Some(NumberInput::AboveRange));
        assert_eq!(read_number("1e400"), Some(NumberInput::AboveRange));
        assert_eq!(read_number("Infinity"), Some(NumberInput::AboveRange));
        assert_eq!(read_number(&"9".repeat(40)), Some(NumberInput::AboveRange));
        assert_eq!(read_number("-1e30"), Some(NumberInput::BelowRange));
        assert_eq!(read_number("1e-400"), Some(NumberInput::Exact(Decimal::ZERO)));
        assert_eq!(read_number("1e-40"), Some(NumberInput::Exact(Decimal::new(1, 28))));
        assert_eq!(read_number("NaN"), None);
        assert_eq!(read_number("   "), None);
    }
}
