//! Amortization calculator: the payment formula and the calculator form state.

pub mod amortization;
pub mod session;
