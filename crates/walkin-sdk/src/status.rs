//! Operator status changes

use serde::{Deserialize, Serialize};
use walkin_queue::TransitionPolicy;
use walkin_store::{DocumentStore, Transaction};
use walkin_types::{Booking, BookingId, BookingStatus, QueueError, QueueResult};

/// Outcome of a status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Booking as stored after the change
    pub booking: Booking,
    /// Status before the change
    pub previous: BookingStatus,
    /// False if the booking already had the requested status
    pub changed: bool,
}

/// Run one read-check-write attempt
pub(crate) async fn update_status_once(
    store: &dyn DocumentStore,
    policy: TransitionPolicy,
    id: &BookingId,
    status: BookingStatus,
) -> QueueResult<StatusChange> {
    let current = store.read_booking(id).await?;
    let version = current.version;
    let booking = current
        .value
        .ok_or_else(|| QueueError::not_found(id.as_str()))?;

    let previous = booking.status;
    policy.check(previous, status)?;

    if previous == status {
        return Ok(StatusChange {
            booking,
            previous,
            changed: false,
        });
    }

    let updated = booking.with_status(status);
    let tx = Transaction::new()
        .expect_booking(id.clone(), version)
        .put_booking(updated.clone());
    store.commit(tx).await?;

    Ok(StatusChange {
        booking: updated,
        previous,
        changed: true,
    })
}
