//! High-level queue service

use futures::stream::BoxStream;
use futures::StreamExt;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use walkin_queue::{EtaCalculator, PositionEstimate, QueueProjection, QueueSummary, TransitionPolicy};
use walkin_store::{retry_on_conflict, DocumentStore, RetryConfig};
use walkin_types::{Booking, BookingId, BookingStatus, Caller, DayKey, QueueError, QueueResult};

use crate::allocator::{allocate_once, BookingReceipt, BookingRequest};
use crate::builder::QueueServiceBuilder;
use crate::clock::Clock;
use crate::stats::{ServiceStats, StatsSnapshot};
use crate::status::{update_status_once, StatusChange};

/// Live stream of a day's queue
pub type ProjectionStream = BoxStream<'static, QueueProjection>;

/// Live stream of one booking
pub type BookingStream = BoxStream<'static, Booking>;

/// Live stream of one booking's position
pub type PositionStream = BoxStream<'static, PositionEstimate>;

/// Walk-in queue service
///
/// Hands out per-day tokens, records bookings, applies operator status
/// changes and serves live views of the queue. Holds no queue state of its
/// own; everything lives in the [`DocumentStore`]. Cheap to clone.
///
/// # Example
///
/// ```
/// use walkin_sdk::prelude::*;
///
/// # async fn example() -> Result<(), QueueError> {
/// let service = QueueService::builder().build().unwrap();
/// let caller = Caller::verified("uid-1", "+15550100");
///
/// let receipt = service
///     .book(&caller, BookingRequest::new("Ana", Service::Haircut))
///     .await?;
/// let position = service.position(&receipt.booking_id).await?;
/// println!("token {} - {} min", receipt.token_number, position.eta_minutes);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct QueueService {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    retry: RetryConfig,
    calculator: EtaCalculator,
    policy: TransitionPolicy,
    stats: Arc<ServiceStats>,
}

impl fmt::Debug for QueueService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueService")
            .field("store", &self.store.name())
            .field("retry", &self.retry)
            .field("calculator", &self.calculator)
            .field("policy", &self.policy)
            .finish()
    }
}

impl QueueService {
    /// Create a new service builder
    pub fn builder() -> QueueServiceBuilder {
        QueueServiceBuilder::new()
    }

    pub(crate) fn from_parts(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        retry: RetryConfig,
        calculator: EtaCalculator,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            retry,
            calculator,
            policy,
            stats: Arc::new(ServiceStats::default()),
        }
    }

    /// Today's day key per the configured clock
    pub fn today(&self) -> DayKey {
        self.clock.today()
    }

    /// The ETA calculator in use
    pub fn calculator(&self) -> &EtaCalculator {
        &self.calculator
    }

    /// The transition policy in use
    pub fn transition_policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// The retry policy in use
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Operation counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    // === Booking ===

    /// Take a token for today
    pub async fn book(&self, caller: &Caller, request: BookingRequest) -> QueueResult<BookingReceipt> {
        let day = self.today();
        self.book_for_day(caller, day, request).await
    }

    /// Take a token for a day given as `YYYY-MM-DD`
    pub async fn book_for_key(
        &self,
        caller: &Caller,
        day: &str,
        request: BookingRequest,
    ) -> QueueResult<BookingReceipt> {
        caller.session()?;
        let day = DayKey::parse(day)?;
        self.book_for_day(caller, day, request).await
    }

    /// Take a token for `day`
    ///
    /// Allocation and booking creation commit together or not at all.
    /// Conflicting concurrent bookings are retried up to the configured
    /// attempt budget; running out yields `Unavailable`.
    #[instrument(skip(self, caller, day, request), fields(day = %day, service = %request.service))]
    pub async fn book_for_day(
        &self,
        caller: &Caller,
        day: DayKey,
        request: BookingRequest,
    ) -> QueueResult<BookingReceipt> {
        let session = caller.session()?;
        let draft = request.into_draft(session)?;

        let conflicts = AtomicU32::new(0);
        let result = retry_on_conflict(&self.retry, "book", |_| {
            let store = self.store.as_ref();
            let draft = &draft;
            let conflicts = &conflicts;
            let now = self.clock.now();
            async move {
                let result = allocate_once(store, draft, day, now).await;
                if matches!(&result, Err(err) if err.is_conflict()) {
                    conflicts.fetch_add(1, Ordering::Relaxed);
                }
                result
            }
        })
        .await;

        match result {
            Ok((booking, attempts)) => {
                self.stats.record_booking(attempts);
                info!(
                    booking_id = %booking.id,
                    token = booking.token_number,
                    attempts,
                    "Booking created"
                );
                Ok(BookingReceipt {
                    booking_id: booking.id,
                    token_number: booking.token_number,
                    day,
                    attempts,
                })
            }
            Err(err) => {
                let conflicts = conflicts.load(Ordering::Relaxed);
                if conflicts >= self.retry.max_attempts {
                    self.stats.record_exhausted(conflicts);
                }
                Err(err)
            }
        }
    }

    // === Status ===

    /// Set a booking's status
    ///
    /// With the permissive policy any status is applied; with the strict
    /// policy only state-machine edges are. Setting the current status again
    /// is a no-op.
    #[instrument(skip(self, id, status), fields(booking_id = %id, status = %status))]
    pub async fn set_status(&self, id: &BookingId, status: BookingStatus) -> QueueResult<StatusChange> {
        let result = retry_on_conflict(&self.retry, "set_status", |_| {
            update_status_once(self.store.as_ref(), self.policy, id, status)
        })
        .await;

        match result {
            Ok((change, _)) => {
                if change.changed {
                    self.stats.record_status_update();
                    info!(from = %change.previous, to = %status, "Status updated");
                } else {
                    debug!("Status unchanged");
                }
                Ok(change)
            }
            Err(err @ QueueError::InvalidTransition { .. }) => {
                self.stats.record_rejected_transition();
                warn!(error = %err, "Status change rejected");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Mark a booking as being served
    pub async fn start(&self, id: &BookingId) -> QueueResult<StatusChange> {
        self.set_status(id, BookingStatus::InProgress).await
    }

    /// Mark a booking as done
    pub async fn complete(&self, id: &BookingId) -> QueueResult<StatusChange> {
        self.set_status(id, BookingStatus::Completed).await
    }

    /// Cancel a booking
    pub async fn cancel(&self, id: &BookingId) -> QueueResult<StatusChange> {
        self.set_status(id, BookingStatus::Cancelled).await
    }

    // === Reads ===

    /// Look up a booking
    #[instrument(skip(self, id), fields(booking_id = %id))]
    pub async fn get_booking(&self, id: &BookingId) -> QueueResult<Booking> {
        self.store
            .read_booking(id)
            .await?
            .value
            .ok_or_else(|| QueueError::not_found(id.as_str()))
    }

    /// Current projection of a day
    #[instrument(skip(self, day), fields(day = %day))]
    pub async fn projection(&self, day: DayKey) -> QueueResult<QueueProjection> {
        let snapshot = self.store.list_day(day).await?;
        Ok(QueueProjection::from_bookings(day, snapshot.bookings.iter().cloned())
            .with_revision(snapshot.revision))
    }

    /// Current summary of a day
    pub async fn summary(&self, day: DayKey) -> QueueResult<QueueSummary> {
        Ok(self.projection(day).await?.summary())
    }

    /// Current position and wait for a booking
    ///
    /// Resolved against the booking's own day.
    #[instrument(skip(self, id), fields(booking_id = %id))]
    pub async fn position(&self, id: &BookingId) -> QueueResult<PositionEstimate> {
        let booking = self.get_booking(id).await?;
        let projection = self.projection(booking.day).await?;
        Ok(self.calculator.estimate(&projection, &booking))
    }

    // === Live views ===

    /// Subscribe to a day's queue
    ///
    /// The first item is the current state. Each subscription is independent;
    /// call again to restart.
    #[instrument(skip(self, day), fields(day = %day))]
    pub async fn watch_queue(&self, day: DayKey) -> QueueResult<ProjectionStream> {
        let snapshots = self.store.watch_day(day).await?;
        debug!(store = self.store.name(), "Queue subscription opened");
        Ok(snapshots
            .map(move |snapshot| {
                QueueProjection::from_bookings(day, snapshot.bookings.iter().cloned())
                    .with_revision(snapshot.revision)
            })
            .boxed())
    }

    /// Subscribe to today's queue
    pub async fn watch_today(&self) -> QueueResult<ProjectionStream> {
        self.watch_queue(self.today()).await
    }

    /// Subscribe to one booking
    ///
    /// Emits the booking now and again whenever it changes.
    #[instrument(skip(self, id), fields(booking_id = %id))]
    pub async fn watch_booking(&self, id: &BookingId) -> QueueResult<BookingStream> {
        let booking = self.get_booking(id).await?;
        let snapshots = self.store.watch_day(booking.day).await?;
        let id = id.clone();

        let stream = snapshots
            .filter_map(move |snapshot| {
                let found = snapshot.find(&id).cloned();
                futures::future::ready(found)
            })
            .scan(None::<Booking>, |last, booking| {
                let fresh = last.as_ref() != Some(&booking);
                if fresh {
                    *last = Some(booking.clone());
                }
                futures::future::ready(Some(fresh.then_some(booking)))
            })
            .filter_map(futures::future::ready);

        Ok(stream.boxed())
    }

    /// Subscribe to one booking's position and wait
    ///
    /// Re-derived on every change to the booking's day; consecutive equal
    /// estimates are collapsed.
    #[instrument(skip(self, id), fields(booking_id = %id))]
    pub async fn watch_position(&self, id: &BookingId) -> QueueResult<PositionStream> {
        let booking = self.get_booking(id).await?;
        let projections = self.watch_queue(booking.day).await?;
        let calculator = self.calculator.clone();
        let id = id.clone();

        let stream = projections
            .filter_map(move |projection| {
                futures::future::ready(calculator.estimate_for(&projection, &id))
            })
            .scan(None::<PositionEstimate>, |last, estimate| {
                let fresh = last.as_ref() != Some(&estimate);
                if fresh {
                    *last = Some(estimate.clone());
                }
                futures::future::ready(Some(fresh.then_some(estimate)))
            })
            .filter_map(futures::future::ready);

        Ok(stream.boxed())
    }
}
