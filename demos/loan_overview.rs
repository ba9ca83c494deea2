//! Loan overview example.
//!
//! Loads a small book of loans, derives each loan's repayment status and
//! quotes a new loan with the calculator.

use chrono::{Duration, Local, NaiveDate, Utc};
use loan_desk::api::memory::InMemoryBackend;
use loan_desk::calculator::session::CalculatorSession;
use loan_desk::core::loan::{Loan, LoanId};
use loan_desk::core::payment::Payment;
use loan_desk::core::status::LoanStatus;
use loan_desk::format::format_currency;
use loan_desk::portfolio::book::LoanBook;
use rust_decimal_macros::dec;

fn loan(id: &str, name: &str, principal: rust_decimal::Decimal, paid_days_ago: &[i64], today: NaiveDate) -> Loan {
    let loan_id = LoanId::new(id);
    let payments = paid_days_ago
        .iter()
        .enumerate()
        .map(|(i, days)| {
            Payment::new(
                format!("{}{}", id, i + 1),
                loan_id.clone(),
                dec!(1500),
                today - Duration::days(*days),
            )
        })
        .collect();
    Loan::new(loan_id, name, principal, today + Duration::days(180), dec!(5)).with_payments(payments)
}

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║      loan-desk: Loan Overview Example    ║");
    println!("╚══════════════════════════════════════════╝\n");

    let today = Local::now().date_naive();
    let backend = InMemoryBackend::new(vec![
        loan("1", "Tom's Loan", dec!(10000), &[2, 40], today),
        loan("2", "Chris Wailaka", dec!(3500), &[12], today),
        loan("3", "NP Mobile Money", dec!(500000), &[45], today),
        loan("4", "Esther's Autoparts", dec!(200000), &[], today),
    ]);

    // --- Scenario 1: Status of every loan ---
    println!("━━━ Scenario 1: Repayment Status ━━━\n");

    let mut book = LoanBook::default();
    if let Err(e) = book.refresh(&backend, Utc::now()) {
        eprintln!("Could not load loans: {}", e);
        return;
    }
    println!("{}", book);

    for status in [LoanStatus::OnTime, LoanStatus::Late, LoanStatus::Defaulted, LoanStatus::Unpaid] {
        let names: Vec<&str> = book.loans_with_status(status).map(|s| s.loan().name()).collect();
        println!("  {:<10} {}", status, names.join(", "));
    }
    println!();
    println!("Total lent:   {}", format_currency(book.total_principal(), true));
    println!("Total repaid: {}", format_currency(book.total_paid(), true));
    println!();

    // --- Scenario 2: Loan calculator ---
    println!("━━━ Scenario 2: Loan Calculator ━━━\n");

    let mut session = CalculatorSession::new();
    session.set_principal("10000");
    if let Some(quote) = session.quote() {
        println!("{}", quote);
    }

    session.set_months("480");
    for message in session.validation().messages() {
        println!("  ✗ {}", message);
    }
    println!("Total interest while invalid: {}", format_currency(session.total_interest(), true));
}
