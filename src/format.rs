//! Display formatting for money amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency code shown in front of every amount.
pub const CURRENCY_CODE: &str = "KES";

/// Format an amount as `KES 1,234` (or `KES 1,234.56` when `floating`).
///
/// Rounds half away from zero; negative amounts carry a leading minus.
///
/// # Examples
///
/// ```
/// use loan_desk::format::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234567.891), true), "KES 1,234,567.89");
/// assert_eq!(format_currency(dec!(1500.5), false), "KES 1,501");
/// ```
pub fn format_currency(amount: Decimal, floating: bool) -> String {
    let places = if floating { 2 } else { 0 };
    let rounded = amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let text = format!("{:.*}", places as usize, rounded.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{} {}.{}", sign, CURRENCY_CODE, grouped, f),
        None => format!("{}{} {}", sign, CURRENCY_CODE, grouped),
    }
}
