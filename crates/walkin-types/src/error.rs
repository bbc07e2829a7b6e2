//! Error types for queue operations

use thiserror::Error;

use crate::status::BookingStatus;

/// Main error type for queue operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    // === Caller Errors ===
    /// No verified identity was supplied
    #[error("Not authenticated: a verified identity is required")]
    Unauthenticated,

    /// Malformed service, name, day or other input
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Booking id does not exist
    #[error("Booking not found: {id}")]
    NotFound { id: String },

    /// Status change rejected by the strict transition policy
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    // === Storage Errors ===
    /// A concurrent commit touched the same record
    ///
    /// Retried internally; callers only see it from raw store operations.
    #[error("Write conflict on {key}")]
    Conflict { key: String },

    /// Storage unreachable, closed, or contention retries exhausted
    #[error("Unavailable: {reason}")]
    Unavailable { reason: String },
}

/// What a caller should do about an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Retry the same operation immediately
    RetryNow,
    /// Retry the whole user action after a pause
    RetryLater,
    /// Fix the request and resubmit
    FixInput,
    /// Sign in and resubmit
    SignIn,
    /// Nothing to retry
    None,
}

impl QueueError {
    /// Create an invalid input error
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an unavailable error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Returns true if retrying the operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Unavailable { .. })
    }

    /// Returns true if this is an optimistic-commit conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Get the recovery strategy for this error
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Conflict { .. } => Recovery::RetryNow,
            Self::Unavailable { .. } => Recovery::RetryLater,
            Self::InvalidInput { .. } => Recovery::FixInput,
            Self::Unauthenticated => Recovery::SignIn,
            Self::NotFound { .. } | Self::InvalidTransition { .. } => Recovery::None,
        }
    }

    /// Short description suitable for showing to an end user
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated => "You must be logged in.".to_string(),
            Self::InvalidInput { field, .. } => match *field {
                "customer_name" => "Please enter your name.".to_string(),
                "service" => "Please select a service.".to_string(),
                other => format!("Please check the {}.", other.replace('_', " ")),
            },
            Self::NotFound { .. } => "That booking could not be found.".to_string(),
            Self::InvalidTransition { from, to } => {
                format!("A {from} booking cannot be marked {to}.")
            }
            Self::Conflict { .. } | Self::Unavailable { .. } => {
                "The queue is busy right now. Please try again.".to_string()
            }
        }
    }
}

/// Result type alias for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
