//! Integration tests for the walk-in queue SDK
//!
//! Drives the full service over the in-memory store: booking, status
//! changes, positions and live views.

mod common;

use common::*;
use walkin_sdk::prelude::*;

// =============================================================================
// Booking
// =============================================================================

#[tokio::test]
async fn test_first_booking_gets_token_one() {
    let (service, memory) = memory_service(QueueService::builder());

    let receipt = service
        .book(&customer(1), request("Ana", Service::Haircut))
        .await
        .unwrap();

    assert_eq!(receipt.token_number, 1);
    assert_eq!(receipt.day, day());
    assert_eq!(receipt.attempts, 1);
    assert_eq!(receipt.booking_id.as_str().len(), 20);

    let booking = service.get_booking(&receipt.booking_id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Queued);
    assert_eq!(booking.customer_name, "Ana");
    assert_eq!(booking.owner.as_str(), "uid-1");
    assert_eq!(booking.customer_contact.as_deref(), Some("+15550100001"));
    assert_eq!(memory.booking_count(), 1);
}

#[tokio::test]
async fn test_sequential_bookings_increase() {
    let (service, _) = memory_service(QueueService::builder());

    let a = service
        .book(&customer(1), request("Ana", Service::Haircut))
        .await
        .unwrap();
    let b = service
        .book(&customer(2), request("Ben", Service::Shave))
        .await
        .unwrap();

    assert!(a.token_number < b.token_number);
    assert_eq!(b.token_number, 2);
}

#[tokio::test]
async fn test_days_have_independent_sequences() {
    let (service, _) = memory_service(QueueService::builder());
    let tomorrow = day().next_day().unwrap();

    let today_1 = service
        .book(&customer(1), request("Ana", Service::Haircut))
        .await
        .unwrap();
    let tomorrow_1 = service
        .book_for_day(&customer(2), tomorrow, request("Ben", Service::Haircut))
        .await
        .unwrap();
    let today_2 = service
        .book_for_key(&customer(3), DAY, request("Cy", Service::Haircut))
        .await
        .unwrap();

    assert_eq!(today_1.token_number, 1);
    assert_eq!(tomorrow_1.token_number, 1);
    assert_eq!(tomorrow_1.day, tomorrow);
    assert_eq!(today_2.token_number, 2);
}

#[tokio::test]
async fn test_anonymous_caller_rejected() {
    let (service, memory) = memory_service(QueueService::builder());

    let err = service
        .book(&Caller::Anonymous, request("Ana", Service::Haircut))
        .await
        .unwrap_err();

    assert_eq!(err, QueueError::Unauthenticated);
    assert!(!err.is_retryable());
    assert_eq!(err.user_message(), "You must be logged in.");
    assert_eq!(memory.booking_count(), 0);
    assert_eq!(memory.revision(), 0);
}

#[tokio::test]
async fn test_invalid_input_rejected() {
    let (service, memory) = memory_service(QueueService::builder());

    let err = service
        .book(&customer(1), request("  ", Service::Haircut))
        .await
        .unwrap_err();
    assert!(matches!(err, QueueError::InvalidInput { field: "customer_name", .. }));

    let err = service
        .book_for_key(&customer(1), "2024-1-1", request("Ana", Service::Haircut))
        .await
        .unwrap_err();
    assert!(matches!(err, QueueError::InvalidInput { field: "day", .. }));

    let err = BookingRequest::parse("Ana", "Massage").unwrap_err();
    assert_eq!(err.user_message(), "Please select a service.");

    assert_eq!(memory.booking_count(), 0);
}

#[tokio::test]
async fn test_request_contact_used_without_session_contact() {
    let (service, _) = memory_service(QueueService::builder());
    let caller = Caller::from(Session::new("uid-9"));

    let receipt = service
        .book(
            &caller,
            request("Dee", Service::Shave).with_contact("+15550109999"),
        )
        .await
        .unwrap();

    let booking = service.get_booking(&receipt.booking_id).await.unwrap();
    assert_eq!(booking.customer_contact.as_deref(), Some("+15550109999"));
}

// =============================================================================
// Position & ETA
// =============================================================================

#[tokio::test]
async fn test_eta_scenario() {
    let (service, _) = memory_service(QueueService::builder());
    let receipts = book_scenario(&service).await;

    let tokens: Vec<u32> = receipts.iter().map(|r| r.token_number).collect();
    assert_eq!(tokens, vec![1, 2, 3]);

    let third = service.position(&receipts[2].booking_id).await.unwrap();
    assert_eq!(third.ahead_count, 2);
    assert_eq!(third.eta_minutes, 45);

    service.complete(&receipts[0].booking_id).await.unwrap();

    let third = service.position(&receipts[2].booking_id).await.unwrap();
    assert_eq!(third.ahead_count, 1);
    assert_eq!(third.eta_minutes, 15);
}

#[tokio::test]
async fn test_eta_target_service_mode() {
    let (service, _) =
        memory_service(QueueService::builder().with_eta_mode(EtaMode::TargetService));
    let receipts = book_scenario(&service).await;

    let third = service.position(&receipts[2].booking_id).await.unwrap();
    assert_eq!(third.ahead_count, 2);
    assert_eq!(third.eta_minutes, 40);

    service.cancel(&receipts[1].booking_id).await.unwrap();
    let third = service.position(&receipts[2].booking_id).await.unwrap();
    assert_eq!(third.ahead_count, 1);
    assert_eq!(third.eta_minutes, 20);
}

#[tokio::test]
async fn test_position_resolves_by_booking_day() {
    let clock = std::sync::Arc::new(FixedClock::new(day()));
    let service = QueueService::builder()
        .with_clock(clock.clone())
        .build()
        .unwrap();

    let a = service
        .book(&customer(1), request("Ana", Service::Haircut))
        .await
        .unwrap();
    let b = service
        .book(&customer(2), request("Ben", Service::Haircut))
        .await
        .unwrap();

    // Midnight passes; the queue for the old day is unaffected
    clock.set_day(day().next_day().unwrap());
    service
        .book(&customer(3), request("Cy", Service::Haircut))
        .await
        .unwrap();

    let pos = service.position(&b.booking_id).await.unwrap();
    assert_eq!(pos.ahead_count, 1);
    assert_eq!(pos.token_number, 2);
    assert_ne!(a.day, service.today());
}

#[tokio::test]
async fn test_summary() {
    let (service, _) = memory_service(QueueService::builder());
    let receipts = book_scenario(&service).await;

    service.start(&receipts[0].booking_id).await.unwrap();
    service.cancel(&receipts[1].booking_id).await.unwrap();

    let summary = service.summary(day()).await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.in_progress, 1);
    assert_eq!(summary.cancelled, 1);
    assert_eq!(summary.queued, 1);
    assert_eq!(summary.now_serving, Some(1));
    assert_eq!(summary.next_up, Some(3));
}

// =============================================================================
// Status changes
// =============================================================================

#[tokio::test]
async fn test_status_lifecycle() {
    let (service, _) = memory_service(QueueService::builder());
    let receipt = service
        .book(&customer(1), request("Ana", Service::Haircut))
        .await
        .unwrap();
    let id = &receipt.booking_id;

    let change = service.start(id).await.unwrap();
    assert!(change.changed);
    assert_eq!(change.previous, BookingStatus::Queued);
    assert_eq!(change.booking.status, BookingStatus::InProgress);

    let change = service.start(id).await.unwrap();
    assert!(!change.changed);

    service.complete(id).await.unwrap();
    let booking = service.get_booking(id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Completed);
    assert_eq!(booking.token_number, 1);

    let stats = service.stats();
    assert_eq!(stats.status_updates, 2);
    assert_eq!(stats.bookings_created, 1);
}

#[tokio::test]
async fn test_permissive_policy_allows_reopening() {
    let (service, _) = memory_service(QueueService::builder());
    let receipt = service
        .book(&customer(1), request("Ana", Service::Haircut))
        .await
        .unwrap();

    service.complete(&receipt.booking_id).await.unwrap();
    let change = service
        .set_status(&receipt.booking_id, BookingStatus::Queued)
        .await
        .unwrap();
    assert_eq!(change.previous, BookingStatus::Completed);
    assert_eq!(change.booking.status, BookingStatus::Queued);
}

#[tokio::test]
async fn test_strict_policy_rejects_illegal_moves() {
    let (service, _) = memory_service(QueueService::builder().strict_transitions());
    let receipt = service
        .book(&customer(1), request("Ana", Service::Haircut))
        .await
        .unwrap();
    let id = &receipt.booking_id;

    let err = service.complete(id).await.unwrap_err();
    assert_eq!(
        err,
        QueueError::InvalidTransition {
            from: BookingStatus::Queued,
            to: BookingStatus::Completed,
        }
    );
    assert_eq!(
        service.get_booking(id).await.unwrap().status,
        BookingStatus::Queued
    );

    service.start(id).await.unwrap();
    service.complete(id).await.unwrap();
    assert!(service.cancel(id).await.is_err());
    assert_eq!(service.stats().rejected_transitions, 2);
}

#[tokio::test]
async fn test_status_update_during_outage_keeps_status() {
    let (service, faulty, memory) =
        faulty_service(QueueService::builder().with_retry_config(RetryConfig::no_backoff()));
    let receipt = service
        .book(&customer(1), request("Ana", Service::Haircut))
        .await
        .unwrap();
    let id = &receipt.booking_id;
    let revision = memory.revision();

    faulty.set_unavailable(true);
    let err = service.start(id).await.unwrap_err();
    assert!(matches!(err, QueueError::Unavailable { .. }));
    assert!(err.is_retryable());
    faulty.set_unavailable(false);

    assert_eq!(memory.revision(), revision);
    assert_eq!(
        service.get_booking(id).await.unwrap().status,
        BookingStatus::Queued
    );
    assert_eq!(service.stats().status_updates, 0);
}

#[tokio::test]
async fn test_status_update_exhausted_keeps_status() {
    let (service, faulty, memory) = faulty_service(
        QueueService::builder()
            .with_retry_config(RetryConfig::no_backoff().with_max_attempts(3)),
    );
    let receipt = service
        .book(&customer(1), request("Ana", Service::Haircut))
        .await
        .unwrap();
    let id = &receipt.booking_id;
    let attempts_before = faulty.commit_attempts();

    faulty.conflict_always(true);
    let err = service.cancel(id).await.unwrap_err();
    assert!(matches!(err, QueueError::Unavailable { .. }));
    faulty.conflict_always(false);

    assert_eq!(faulty.commit_attempts() - attempts_before, 3);
    assert_eq!(memory.booking_count(), 1);
    assert_eq!(
        service.get_booking(id).await.unwrap().status,
        BookingStatus::Queued
    );
}

#[tokio::test]
async fn test_status_update_retried_after_conflicts() {
    let (service, faulty, _) =
        faulty_service(QueueService::builder().with_retry_config(RetryConfig::no_backoff()));
    let receipt = service
        .book(&customer(1), request("Ana", Service::Haircut))
        .await
        .unwrap();
    let id = &receipt.booking_id;
    let applied_before = faulty.commits_applied();
    let attempts_before = faulty.commit_attempts();

    faulty.inject_conflicts(2);
    let change = service.start(id).await.unwrap();
    assert!(change.changed);
    assert_eq!(change.previous, BookingStatus::Queued);

    assert_eq!(faulty.commit_attempts() - attempts_before, 3);
    assert_eq!(faulty.commits_applied() - applied_before, 1);
    assert_eq!(
        service.get_booking(id).await.unwrap().status,
        BookingStatus::InProgress
    );
    assert_eq!(service.stats().status_updates, 1);
}

#[tokio::test]
async fn test_unknown_booking() {
    let (service, _) = memory_service(QueueService::builder());
    let id = BookingId::new("does-not-exist");

    assert_eq!(
        service.start(&id).await.unwrap_err(),
        QueueError::not_found("does-not-exist")
    );
    assert!(matches!(
        service.get_booking(&id).await,
        Err(QueueError::NotFound { .. })
    ));
    assert!(matches!(
        service.position(&id).await,
        Err(QueueError::NotFound { .. })
    ));
    assert!(matches!(
        service.watch_booking(&id).await,
        Err(QueueError::NotFound { .. })
    ));
}

// =============================================================================
// Live views
// =============================================================================

#[tokio::test]
async fn test_watch_queue_starts_from_current_state() {
    let (service, _) = memory_service(QueueService::builder());
    service
        .book(&customer(1), request("Ana", Service::Haircut))
        .await
        .unwrap();

    let mut queue = service.watch_today().await.unwrap();
    let first = next_item(&mut queue).await;
    assert_eq!(first.tokens(), vec![1]);

    let receipt = service
        .book(&customer(2), request("Ben", Service::Shave))
        .await
        .unwrap();
    let second = next_item(&mut queue).await;
    assert_eq!(second.tokens(), vec![1, 2]);
    assert!(second.revision() > first.revision());

    service.start(&receipt.booking_id).await.unwrap();
    let third = next_item(&mut queue).await;
    assert_eq!(third.now_serving().unwrap().token_number, 2);
}

#[tokio::test]
async fn test_independent_subscribers() {
    let (service, _) = memory_service(QueueService::builder());

    let mut early = service.watch_queue(day()).await.unwrap();
    assert!(next_item(&mut early).await.is_empty());

    service
        .book(&customer(1), request("Ana", Service::Haircut))
        .await
        .unwrap();

    // A late subscriber starts from the current state
    let mut late = service.watch_queue(day()).await.unwrap();
    assert_eq!(next_item(&mut late).await.len(), 1);
    assert_eq!(next_item(&mut early).await.len(), 1);
}

#[tokio::test]
async fn test_watch_booking_follows_status() {
    let (service, _) = memory_service(QueueService::builder());
    let receipt = service
        .book(&customer(1), request("Ana", Service::Haircut))
        .await
        .unwrap();

    let mut watch = service.watch_booking(&receipt.booking_id).await.unwrap();
    assert_eq!(next_item(&mut watch).await.status, BookingStatus::Queued);

    // Other bookings on the same day do not re-emit
    service
        .book(&customer(2), request("Ben", Service::Shave))
        .await
        .unwrap();
    service.start(&receipt.booking_id).await.unwrap();

    assert_eq!(next_item(&mut watch).await.status, BookingStatus::InProgress);
}

#[tokio::test]
async fn test_watch_position_scenario() {
    let (service, _) = memory_service(QueueService::builder());
    let receipts = book_scenario(&service).await;

    let mut position = service
        .watch_position(&receipts[2].booking_id)
        .await
        .unwrap();
    let first = next_item(&mut position).await;
    assert_eq!(first.ahead_count, 2);
    assert_eq!(first.eta_minutes, 45);

    service.complete(&receipts[0].booking_id).await.unwrap();
    let second = next_item(&mut position).await;
    assert_eq!(second.ahead_count, 1);
    assert_eq!(second.eta_minutes, 15);

    service.start(&receipts[2].booking_id).await.unwrap();
    let third = next_item(&mut position).await;
    assert_eq!(third.status, BookingStatus::InProgress);
}
