//! Front-end state around the pure core: the loan list, the search box
//! debounce and the record-payment form.

pub mod book;
pub mod debounce;
pub mod submission;
