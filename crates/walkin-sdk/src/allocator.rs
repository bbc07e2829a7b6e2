//! Token allocation and booking creation
//!
//! One allocation attempt reads the day's sequence, picks the next token and
//! commits the new sequence together with the new booking. The commit is
//! guarded by the sequence version that was read, so two attempts that read
//! the same value can never both succeed; the loser is retried from scratch
//! by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use walkin_store::{DocumentStore, Transaction};
use walkin_types::{
    Booking, BookingId, BookingStatus, DayKey, DaySequence, OwnerIdentity, QueueError,
    QueueResult, Service, Session,
};

/// What a customer submits to join the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Name to call out
    pub customer_name: String,
    /// Requested service
    pub service: Service,
    /// Contact handle, used only when the session carries none
    pub contact: Option<String>,
}

impl BookingRequest {
    /// Create a request
    pub fn new(customer_name: impl Into<String>, service: Service) -> Self {
        Self {
            customer_name: customer_name.into(),
            service,
            contact: None,
        }
    }

    /// Create a request from raw form input
    ///
    /// Fails with `InvalidInput` if `service` is not a known service.
    pub fn parse(customer_name: impl Into<String>, service: &str) -> QueueResult<Self> {
        Ok(Self::new(customer_name, service.parse()?))
    }

    /// Attach a contact handle
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// Check the request fields
    pub fn validate(&self) -> QueueResult<()> {
        if self.customer_name.trim().is_empty() {
            return Err(QueueError::invalid_input(
                "customer_name",
                "must not be blank",
            ));
        }
        Ok(())
    }

    /// Resolve the request against the caller's session
    pub(crate) fn into_draft(self, session: &Session) -> QueueResult<BookingDraft> {
        self.validate()?;
        let contact = session
            .contact
            .clone()
            .or(self.contact)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(BookingDraft {
            customer_name: self.customer_name.trim().to_string(),
            customer_contact: contact,
            service: self.service,
            owner: session.owner.clone(),
        })
    }
}

/// Validated booking fields, ready to be given a token
#[derive(Debug, Clone)]
pub(crate) struct BookingDraft {
    pub customer_name: String,
    pub customer_contact: Option<String>,
    pub service: Service,
    pub owner: OwnerIdentity,
}

/// Result of a successful booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReceipt {
    /// New booking id
    pub booking_id: BookingId,
    /// Token handed out
    pub token_number: u32,
    /// Day the token belongs to
    pub day: DayKey,
    /// Commit attempts it took
    pub attempts: u32,
}

/// Run one read-increment-create attempt
pub(crate) async fn allocate_once(
    store: &dyn DocumentStore,
    draft: &BookingDraft,
    day: DayKey,
    now: DateTime<Utc>,
) -> QueueResult<Booking> {
    let current = store.read_sequence(day).await?;
    let sequence = current.value.unwrap_or_else(|| DaySequence::start(day));
    let token_number = sequence
        .next_token()
        .ok_or_else(|| QueueError::unavailable(format!("token sequence for {day} is exhausted")))?;

    let booking = Booking {
        id: BookingId::generate(),
        day,
        token_number,
        customer_name: draft.customer_name.clone(),
        customer_contact: draft.customer_contact.clone(),
        service: draft.service,
        status: BookingStatus::Queued,
        owner: draft.owner.clone(),
        created_at: now,
    };

    let tx = Transaction::new()
        .expect_sequence(day, current.version)
        .put_sequence(sequence.advanced_to(token_number))
        .create_booking(booking.clone());
    store.commit(tx).await?;

    Ok(booking)
}
