//! Storage errors

use thiserror::Error;
use walkin_types::QueueError;

/// Errors returned by a [`DocumentStore`](crate::DocumentStore)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A precondition no longer holds, or a created record already exists
    #[error("conflict on {collection}/{id}")]
    Conflict { collection: &'static str, id: String },

    /// A write targets a record that does not exist
    #[error("{collection}/{id} not found")]
    NotFound { collection: &'static str, id: String },

    /// Backend unreachable
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store was shut down
    #[error("store closed")]
    Closed,
}

impl StoreError {
    /// Create a conflict error
    pub fn conflict(collection: &'static str, id: impl Into<String>) -> Self {
        Self::Conflict {
            collection,
            id: id.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(collection: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }

    /// Returns true if re-running the whole transaction may succeed
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<StoreError> for QueueError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { collection, id } => QueueError::Conflict {
                key: format!("{collection}/{id}"),
            },
            StoreError::NotFound { id, .. } => QueueError::not_found(id),
            StoreError::Unavailable(reason) => QueueError::unavailable(reason),
            StoreError::Closed => QueueError::unavailable("store closed"),
        }
    }
}
