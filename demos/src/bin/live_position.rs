//! Demo 2: Live Position
//!
//! Showcases: a customer's confirmation screen following its own position
//! while staff serve the people ahead
//!
//! Run: cargo run --bin live_position

use colored::*;
use futures::StreamExt;
use std::time::Duration;
use walkin_sdk::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  LIVE POSITION".cyan().bold());
    println!("{}", "  Walk-in Queue Demo - Confirmation Screen".cyan());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let service = QueueService::builder().build()?;

    let mut ahead = Vec::new();
    for (i, (name, svc)) in [
        ("Asha", Service::Haircut),
        ("Bilal", Service::BeardTrim),
        ("Chen", Service::Haircut),
    ]
    .into_iter()
    .enumerate()
    {
        let caller = Caller::verified(format!("uid-{i}"), format!("+1555010{i:04}"));
        ahead.push(service.book(&caller, BookingRequest::new(name, svc)).await?);
    }

    let me = Caller::verified("uid-me", "+15550109999");
    let mine = service
        .book(&me, BookingRequest::parse("Dee", "shave")?)
        .await?;
    println!(
        "{} Booking confirmed: token #{} for {}",
        "✓".green(),
        mine.token_number.to_string().bold(),
        mine.day
    );
    println!();

    let mut position = service.watch_position(&mine.booking_id).await?;
    let screen = tokio::spawn(async move {
        while let Some(estimate) = position.next().await {
            let line = if estimate.status != BookingStatus::Queued {
                format!("Status: {}", estimate.status).green().bold()
            } else if estimate.is_next() {
                "You're next!".green().bold()
            } else {
                format!(
                    "{} ahead of you · about {} min",
                    estimate.ahead_count, estimate.eta_minutes
                )
                .yellow()
            };
            println!("  {line}");
        }
    });

    for receipt in &ahead {
        tokio::time::sleep(Duration::from_millis(400)).await;
        service.start(&receipt.booking_id).await?;
        tokio::time::sleep(Duration::from_millis(400)).await;
        service.complete(&receipt.booking_id).await?;
    }
    tokio::time::sleep(Duration::from_millis(400)).await;
    service.start(&mine.booking_id).await?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    screen.abort();

    println!();
    println!("{}", "═".repeat(60).cyan());
    Ok(())
}
