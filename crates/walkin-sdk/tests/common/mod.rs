//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use futures::stream::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use walkin_sdk::prelude::*;
use walkin_store::FaultyStore;

/// Day used by every scenario
pub const DAY: &str = "2024-01-01";

/// How long a live stream may stay silent before a test fails
pub const STREAM_TIMEOUT: Duration = Duration::from_secs(5);

pub fn day() -> DayKey {
    DayKey::parse(DAY).unwrap()
}

/// Verified caller number `n`
pub fn customer(n: u32) -> Caller {
    Caller::verified(format!("uid-{n}"), format!("+1555010{n:04}"))
}

pub fn request(name: &str, service: Service) -> BookingRequest {
    BookingRequest::new(name, service)
}

/// Install a test subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Service over a fresh in-memory store, pinned to [`DAY`]
pub fn memory_service(builder: QueueServiceBuilder) -> (QueueService, Arc<MemoryStore>) {
    init_tracing();
    let memory = Arc::new(MemoryStore::new());
    let service = builder
        .with_store(memory.clone())
        .with_clock(Arc::new(FixedClock::new(day())))
        .build()
        .unwrap();
    (service, memory)
}

/// Service over a fault-injecting wrapper around a fresh in-memory store
pub fn faulty_service(
    builder: QueueServiceBuilder,
) -> (QueueService, Arc<FaultyStore>, Arc<MemoryStore>) {
    init_tracing();
    let memory = Arc::new(MemoryStore::new());
    let faulty = Arc::new(FaultyStore::new(memory.clone()));
    let service = builder
        .with_store(faulty.clone())
        .with_clock(Arc::new(FixedClock::new(day())))
        .build()
        .unwrap();
    (service, faulty, memory)
}

/// Book Haircut, Beard Trim and Shave in that order
pub async fn book_scenario(service: &QueueService) -> Vec<BookingReceipt> {
    let mut receipts = Vec::new();
    for (n, (name, svc)) in [
        ("Ana", Service::Haircut),
        ("Ben", Service::BeardTrim),
        ("Cy", Service::Shave),
    ]
    .into_iter()
    .enumerate()
    {
        let receipt = service
            .book(&customer(n as u32 + 1), request(name, svc))
            .await
            .unwrap();
        receipts.push(receipt);
    }
    receipts
}

/// Next stream item, failing the test if none arrives in time
pub async fn next_item<S, T>(stream: &mut S) -> T
where
    S: Stream<Item = T> + Unpin,
{
    tokio::time::timeout(STREAM_TIMEOUT, stream.next())
        .await
        .expect("stream stalled")
        .expect("stream ended")
}
