//! Status change policy
//!
//! ```text
//!   Queued ──► In Progress ──► Completed
//!     │             │
//!     └─────────────┴────────► Cancelled
//! ```
//!
//! [`TransitionPolicy::Permissive`] applies whatever status the operator
//! picks. [`TransitionPolicy::Strict`] only allows the edges above.

use serde::{Deserialize, Serialize};
use walkin_types::{BookingStatus, QueueError, QueueResult};

/// Which status changes the operator may apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransitionPolicy {
    /// Any status may follow any other
    #[default]
    Permissive,
    /// Only state-machine edges (and no-op changes) are allowed
    Strict,
}

impl TransitionPolicy {
    /// Check a status change
    pub fn check(&self, from: BookingStatus, to: BookingStatus) -> QueueResult<()> {
        match self {
            Self::Permissive => Ok(()),
            Self::Strict if from.can_transition_to(to) => Ok(()),
            Self::Strict => Err(QueueError::InvalidTransition { from, to }),
        }
    }

    /// Check if the policy rejects anything at all
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}
