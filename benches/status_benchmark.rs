use chrono::{NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use loan_desk::api::memory::InMemoryBackend;
use loan_desk::calculator::amortization::{amortization_schedule, amortize};
use loan_desk::core::status::{resolve_status, StatusThresholds};
use loan_desk::portfolio::book::LoanBook;
use loan_desk::simulation::sample::{generate_portfolio, PortfolioConfig};
use rust_decimal_macros::dec;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn bench_resolve_1000_loans(c: &mut Criterion) {
    let config = PortfolioConfig {
        loan_count: 1000,
        max_payments_per_loan: 12,
        ..Default::default()
    };
    let loans = generate_portfolio(&config, as_of());
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let thresholds = StatusThresholds::default();

    c.bench_function("resolve_status_1000_loans", |b| {
        b.iter(|| {
            for loan in &loans {
                black_box(resolve_status(loan.payments(), now, &thresholds));
            }
        })
    });
}

fn bench_refresh_book(c: &mut Criterion) {
    let config = PortfolioConfig {
        loan_count: 1000,
        ..Default::default()
    };
    let backend = InMemoryBackend::new(generate_portfolio(&config, as_of()));
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

    c.bench_function("refresh_book_1000_loans", |b| {
        b.iter(|| {
            let mut book = LoanBook::default();
            book.refresh(black_box(&backend), now).unwrap()
        })
    });
}

fn bench_amortize(c: &mut Criterion) {
    c.bench_function("amortize_360_months", |b| {
        b.iter(|| amortize(black_box(dec!(250000)), black_box(dec!(13)), black_box(dec!(360))))
    });
    c.bench_function("schedule_360_months", |b| {
        b.iter(|| amortization_schedule(black_box(dec!(250000)), black_box(dec!(13)), 360))
    });
}

criterion_group!(
    benches,
    bench_resolve_1000_loans,
    bench_refresh_book,
    bench_amortize
);
criterion_main!(benches);
