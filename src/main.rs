//! loan-desk CLI
//!
//! Inspect loan snapshots, quote loans and record repayments from the
//! command line.
//!
//! # Usage
//!
//! ```bash
//! # List loans with their repayment status
//! loan-desk loans --input loans.json
//!
//! # Quote a loan
//! loan-desk calc --principal 10000 --rate 13 --months 12
//!
//! # Record a repayment against a snapshot
//! loan-desk pay --input loans.json --loan 1 --amount 2500 --date 2024-03-15 --output loans.json
//!
//! # Generate a random snapshot for testing
//! loan-desk generate --loans 20 --output loans.json
//! ```

use chrono::{Local, Utc};
use loan_desk::api::graphql::{loans_response, LoanFilter};
use loan_desk::api::memory::InMemoryBackend;
use loan_desk::calculator::amortization::amortization_schedule;
use loan_desk::calculator::session::CalculatorSession;
use loan_desk::config::DeskConfig;
use loan_desk::core::loan::{LoanId, LoanSummary};
use loan_desk::format::format_currency;
use loan_desk::portfolio::book::LoanBook;
use loan_desk::portfolio::submission::{PaymentForm, SubmitError};
use loan_desk::simulation::sample::{generate_portfolio, PortfolioConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"loan-desk — loan status, repayments and amortization

USAGE:
    loan-desk <COMMAND> [OPTIONS]

COMMANDS:
    loans       List loans with repayment status
    calc        Quote a fixed-payment loan
    pay         Record a repayment against a loans snapshot
    generate    Generate a random loans snapshot (for testing)
    help        Show this message

OPTIONS (loans):
    --input <FILE>      Loans snapshot (GraphQL response or array)
    --name <TEXT>       Only loans whose name contains TEXT
    --amount <N>        Only loans with principal N
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (calc):
    --principal <P>     Amount borrowed
    --rate <R>          Annual interest rate in percent (default: 13)
    --months <N>        Term in months (default: 12)
    --schedule          Also print the month-by-month schedule
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (pay):
    --input <FILE>      Loans snapshot
    --loan <ID>         Loan to pay against
    --amount <A>        Amount paid
    --date <DATE>       Payment date, YYYY-MM-DD
    --output <FILE>     Write the updated snapshot here

OPTIONS (generate):
    --loans <N>         Number of loans (default: 10)
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    LOAN_DESK_CONFIG    Path to a JSON config file
    RUST_LOG            Log level (error, warn, info, debug)

EXAMPLES:
    loan-desk loans --input loans.json --name tom
    loan-desk calc --principal 10000 --rate 13 --months 12 --format json
    loan-desk pay --input loans.json --loan 1 --amount 2500 --date 2024-03-15
    loan-desk generate --loans 20 --output loans.json"#
    );
}

/// JSON output schema for a listed loan.
#[derive(serde::Serialize)]
struct LoanOutput {
    id: String,
    name: String,
    principal: String,
    interest_rate: String,
    due_date: String,
    status: String,
    days_overdue: u32,
    total_paid: String,
    payments: Vec<PaymentOutput>,
}

#[derive(serde::Serialize)]
struct PaymentOutput {
    id: String,
    date: Option<String>,
    amount: String,
}

/// JSON output schema for a calculator quote.
#[derive(serde::Serialize)]
struct QuoteOutput {
    valid: bool,
    errors: Vec<String>,
    monthly_payment: String,
    total_interest: String,
    total_amount: String,
}

impl From<&LoanSummary> for LoanOutput {
    fn from(summary: &LoanSummary) -> Self {
        let loan = summary.loan();
        LoanOutput {
            id: loan.id().to_string(),
            name: loan.name().to_string(),
            principal: loan.principal().to_string(),
            interest_rate: loan.interest_rate().to_string(),
            due_date: loan.due_date().to_string(),
            status: summary.status().to_string(),
            days_overdue: summary.days_overdue(),
            total_paid: summary.total_paid().to_string(),
            payments: summary
                .payments()
                .iter()
                .map(|p| PaymentOutput {
                    id: p.id().to_string(),
                    date: p.payment_date().map(|d| d.to_string()),
                    amount: p.amount_or_zero().to_string(),
                })
                .collect(),
        }
    }
}

/// Take the value following a flag, or exit with `message`.
fn flag_value(args: &[String], i: usize, message: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{}", message);
        process::exit(1);
    })
}

fn load_config() -> DeskConfig {
    let base = match std::env::var("LOAN_DESK_CONFIG") {
        Ok(path) => DeskConfig::from_file(&path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        Err(_) => DeskConfig::default(),
    };
    base.with_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    })
}

fn load_backend(path: &str) -> InMemoryBackend {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });
    InMemoryBackend::from_snapshot(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing loans: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "data": {{
    "loans": [
      {{ "id": "1", "name": "Tom's Loan", "principal": 10000, "dueDate": "2025-03-01",
        "interestRate": 5.0, "payments": [{{ "id": "1", "paymentDate": "2024-03-04", "amount": 5000 }}] }}
    ]
  }}
}}"#
        );
        process::exit(1);
    })
}

fn load_book(backend: &InMemoryBackend, config: &DeskConfig, filter: LoanFilter) -> LoanBook {
    let mut book = LoanBook::new(config.thresholds);
    book.set_filter(filter);
    book.refresh(backend, Utc::now()).unwrap_or_else(|e| {
        eprintln!("Error loading loans: {}", e);
        process::exit(1);
    });
    book
}

fn cmd_loans(args: &[String], config: &DeskConfig) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut filter = config.initial_filter.clone();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(flag_value(args, i, "--input requires a file path"));
            }
            "--name" => {
                i += 1;
                filter.name = Some(flag_value(args, i, "--name requires text"));
            }
            "--amount" => {
                i += 1;
                let raw = flag_value(args, i, "--amount requires a number");
                filter.amount = Some(raw.parse().unwrap_or_else(|_| {
                    eprintln!("--amount requires a whole number, got '{}'", raw);
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = flag_value(args, i, "--format requires 'text' or 'json'");
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let backend = load_backend(&path);
    let book = load_book(&backend, config, filter);

    if format == "json" {
        let output: Vec<LoanOutput> = book.loans().iter().map(LoanOutput::from).collect();
        println!("{}", to_json(&output));
    } else if book.is_empty() {
        println!("No loans found.");
    } else {
        println!("{}", book);
    }
}

fn cmd_calc(args: &[String]) {
    let mut session = CalculatorSession::new();
    let mut format = "text".to_string();
    let mut show_schedule = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--principal" => {
                i += 1;
                session.set_principal(&flag_value(args, i, "--principal requires an amount"));
            }
            "--rate" => {
                i += 1;
                session.set_rate(&flag_value(args, i, "--rate requires a percentage"));
            }
            "--months" => {
                i += 1;
                session.set_months(&flag_value(args, i, "--months requires a number"));
            }
            "--schedule" => show_schedule = true,
            "--format" => {
                i += 1;
                format = flag_value(args, i, "--format requires 'text' or 'json'");
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    if format == "json" {
        let output = QuoteOutput {
            valid: session.is_valid(),
            errors: session.validation().messages(),
            monthly_payment: session
                .quote()
                .map(|q| q.monthly_payment.round_dp(2).to_string())
                .unwrap_or_else(|| "0".to_string()),
            total_interest: session.total_interest().round_dp(2).to_string(),
            total_amount: session.total_amount().round_dp(2).to_string(),
        };
        println!("{}", to_json(&output));
        return;
    }

    let Some(quote) = session.quote() else {
        for message in session.validation().messages() {
            eprintln!("Error: {}", message);
        }
        println!("Total interest: {}", format_currency(session.total_interest(), true));
        println!("Total amount:   {}", format_currency(session.total_amount(), true));
        process::exit(1);
    };
    println!("{}", quote);

    if show_schedule {
        let months = quote.term_months.normalize().to_string().parse::<u32>().unwrap_or_else(|_| {
            eprintln!("Schedule needs a whole number of months");
            process::exit(1);
        });
        println!("{:>6} {:>16} {:>16} {:>16} {:>18}", "Month", "Payment", "Interest", "Principal", "Balance");
        for row in amortization_schedule(quote.principal, quote.annual_rate_percent, months) {
            println!(
                "{:>6} {:>16} {:>16} {:>16} {:>18}",
                row.period,
                format_currency(row.payment, true),
                format_currency(row.interest, true),
                format_currency(row.principal, true),
                format_currency(row.balance, true)
            );
        }
    }
}

fn cmd_pay(args: &[String], config: &DeskConfig) {
    let mut input_path = None;
    let mut loan_id = None;
    let mut amount = String::new();
    let mut date = String::new();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(flag_value(args, i, "--input requires a file path"));
            }
            "--loan" => {
                i += 1;
                loan_id = Some(LoanId::new(flag_value(args, i, "--loan requires a loan ID")));
            }
            "--amount" => {
                i += 1;
                amount = flag_value(args, i, "--amount requires a number");
            }
            "--date" => {
                i += 1;
                date = flag_value(args, i, "--date requires YYYY-MM-DD");
            }
            "--output" => {
                i += 1;
                output_path = Some(flag_value(args, i, "--output requires a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    let loan_id = loan_id.unwrap_or_else(|| {
        eprintln!("Error: --loan <ID> is required");
        process::exit(1);
    });

    let mut backend = load_backend(&path);
    let mut book = load_book(&backend, config, LoanFilter::default());
    if !book.select(&loan_id) {
        eprintln!("Error: Loan with ID {} not found", loan_id);
        process::exit(1);
    }

    let mut form = PaymentForm::new();
    if let Some(selected) = book.selected() {
        form.open_for(selected);
    }
    form.set_amount(&amount);
    form.set_date(&date);

    let today = Local::now().date_naive();
    match form.submit(&mut backend, &mut book, today, Utc::now()) {
        Ok(payment) => {
            eprintln!(
                "Recorded payment {} of {} on loan {}",
                payment.id(),
                format_currency(payment.amount_or_zero(), true),
                loan_id
            );
        }
        Err(SubmitError::Invalid(validation)) => {
            for message in validation.messages() {
                eprintln!("Error: {}", message);
            }
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    if let Some(summary) = book.get(&loan_id) {
        println!("{}", summary);
    }

    if let Some(out) = output_path {
        let json = backend.to_snapshot().unwrap_or_else(|e| {
            eprintln!("Error serializing loans: {}", e);
            process::exit(1);
        });
        fs::write(&out, json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", out, e);
            process::exit(1);
        });
        eprintln!("Snapshot written to {}", out);
    }
}

fn cmd_generate(args: &[String]) {
    let mut loans = 10usize;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--loans" => {
                i += 1;
                loans = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--loans requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(flag_value(args, i, "--output requires a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = PortfolioConfig {
        loan_count: loans,
        ..Default::default()
    };
    let portfolio = generate_portfolio(&config, Local::now().date_naive());
    let json = to_json(&loans_response(&portfolio));

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Generated {} loans → {}", portfolio.len(), path);
    } else {
        println!("{}", json);
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error serializing output: {}", e);
        process::exit(1);
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "loans" => cmd_loans(rest, &load_config()),
        "calc" => cmd_calc(rest),
        "pay" => cmd_pay(rest, &load_config()),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
