pub mod loan;
pub mod payment;
pub mod status;
