//! Repayment flow example.
//!
//! Walks a late loan through the record-payment form: a rejected entry, a
//! backend outage, then a successful payment that brings it back on time.

use chrono::{Duration, Local, Utc};
use loan_desk::api::memory::InMemoryBackend;
use loan_desk::core::loan::{Loan, LoanId};
use loan_desk::core::payment::Payment;
use loan_desk::portfolio::book::LoanBook;
use loan_desk::portfolio::submission::{PaymentForm, SubmitError};
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║    loan-desk: Repayment Flow Example     ║");
    println!("╚══════════════════════════════════════════╝\n");

    let today = Local::now().date_naive();
    let id = LoanId::new("1");
    let mut backend = InMemoryBackend::new(vec![Loan::new(
        id.clone(),
        "Tom's Loan",
        dec!(10000),
        today + Duration::days(200),
        dec!(5),
    )
    .with_payments(vec![Payment::new(
        "1",
        id.clone(),
        dec!(5000),
        today - Duration::days(10),
    )])]);

    let mut book = LoanBook::default();
    if let Err(e) = book.refresh(&backend, Utc::now()) {
        eprintln!("Could not load loans: {}", e);
        return;
    }
    book.select(&id);
    let Some(selected) = book.selected() else {
        return;
    };
    println!("━━━ Before ━━━\n");
    println!("{}", selected);

    let mut form = PaymentForm::new();
    form.open_for(selected);
    println!("{}\n", form.title());

    // --- Step 1: invalid entry ---
    form.set_amount("-200");
    form.set_date(&(today + Duration::days(1)).to_string());
    if let Err(SubmitError::Invalid(validation)) = form.submit(&mut backend, &mut book, today, Utc::now()) {
        println!("Rejected:");
        for message in validation.messages() {
            println!("  ✗ {}", message);
        }
    }

    // --- Step 2: backend outage ---
    form.set_amount("2500");
    form.set_date(&today.to_string());
    backend.set_offline(true);
    if form.submit(&mut backend, &mut book, today, Utc::now()).is_err() {
        println!("\nBackend error: {}", form.last_error().unwrap_or("unknown"));
        println!("Form kept open with amount {}", form.amount());
    }

    // --- Step 3: retry ---
    backend.set_offline(false);
    match form.submit(&mut backend, &mut book, today, Utc::now()) {
        Ok(payment) => println!("\nRecorded payment {}\n", payment.id()),
        Err(e) => {
            eprintln!("Retry failed: {}", e);
            return;
        }
    }

    println!("━━━ After ━━━\n");
    if let Some(summary) = book.get(&id) {
        println!("{}", summary);
    }
}
