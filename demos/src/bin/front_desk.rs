//! Demo 1: Front Desk
//!
//! Showcases: concurrent token allocation, operator status changes, live
//! dashboard
//!
//! Run: cargo run --bin front_desk
//! Verbose: RUST_LOG=walkin_sdk=debug cargo run --bin front_desk

use colored::*;
use futures::StreamExt;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use walkin_sdk::prelude::*;

const CUSTOMERS: [(&str, Service); 8] = [
    ("Asha", Service::Haircut),
    ("Bilal", Service::BeardTrim),
    ("Chen", Service::Shave),
    ("Dana", Service::Haircut),
    ("Emeka", Service::Shave),
    ("Farah", Service::BeardTrim),
    ("Goran", Service::Haircut),
    ("Hina", Service::Shave),
];

fn status_label(status: BookingStatus) -> ColoredString {
    match status {
        BookingStatus::Queued => status.as_str().yellow(),
        BookingStatus::InProgress => status.as_str().cyan().bold(),
        BookingStatus::Completed => status.as_str().green(),
        BookingStatus::Cancelled => status.as_str().red(),
    }
}

fn print_board(projection: &QueueProjection, calculator: &EtaCalculator) {
    println!(
        "  {:>5}  {:<8}  {:<11}  {:<12}  {:>6}",
        "TOKEN".white().bold(),
        "NAME".white().bold(),
        "SERVICE".white().bold(),
        "STATUS".white().bold(),
        "ETA".white().bold()
    );
    println!("  {}", "─".repeat(52));
    for booking in projection.iter() {
        let eta = if booking.is_active() {
            format!("{}m", calculator.estimate(projection, booking).eta_minutes)
        } else {
            "-".to_string()
        };
        println!(
            "  {:>5}  {:<8}  {:<11}  {:<12}  {:>6}",
            format!("#{}", booking.token_number),
            booking.customer_name,
            booking.service.as_str(),
            status_label(booking.status),
            eta
        );
    }
    println!("  {}", projection.summary().to_string().dimmed());
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  FRONT DESK".cyan().bold());
    println!("{}", "  Walk-in Queue Demo - Tokens, Status & Live Board".cyan());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let service = QueueServiceBuilder::from_env()?
        .with_max_attempts(CUSTOMERS.len() as u32)
        .build()?;
    let today = service.today();

    // Every customer walks in at the same moment
    let mut handles = Vec::new();
    for (i, (name, svc)) in CUSTOMERS.into_iter().enumerate() {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let caller = Caller::verified(format!("uid-{i}"), format!("+1555010{i:04}"));
            service.book(&caller, BookingRequest::new(name, svc)).await
        }));
    }

    let mut receipts = Vec::new();
    for handle in handles {
        match handle.await? {
            Ok(receipt) => {
                println!(
                    "{} Token #{} issued ({} attempt{})",
                    "✓".green(),
                    receipt.token_number,
                    receipt.attempts,
                    if receipt.attempts == 1 { "" } else { "s" }
                );
                receipts.push(receipt);
            }
            Err(err) => println!("{} {}", "✗".red(), err.user_message()),
        }
    }
    receipts.sort_by_key(|r| r.token_number);
    println!();

    // Dashboard follows the live queue
    let mut board = service.watch_queue(today).await?;
    let calculator = service.calculator().clone();
    let dashboard = tokio::spawn(async move {
        while let Some(projection) = board.next().await {
            print_board(&projection, &calculator);
        }
    });

    // Staff work through the first few tokens
    for (i, receipt) in receipts.iter().take(4).enumerate() {
        tokio::time::sleep(Duration::from_millis(300)).await;
        service.start(&receipt.booking_id).await?;
        tokio::time::sleep(Duration::from_millis(300)).await;
        if i == 2 {
            service.cancel(&receipt.booking_id).await?;
        } else {
            service.complete(&receipt.booking_id).await?;
        }
    }
    tokio::time::sleep(Duration::from_millis(300)).await;
    dashboard.abort();

    let stats = service.stats();
    println!("{}", "═".repeat(60).cyan());
    println!("  {}", "SESSION REPORT".white().bold());
    println!("  Bookings created:   {}", stats.bookings_created);
    println!("  Conflicts retried:  {}", stats.conflicts_retried);
    println!("  Status updates:     {}", stats.status_updates);
    println!("{}", "═".repeat(60).cyan());

    Ok(())
}
