//! Versioned record reads

/// Record version; 0 means the record does not exist
pub type Version = u64;

/// Version assigned to absent records
pub const ABSENT: Version = 0;

/// A point read together with the version it was read at
///
/// Pass `version` back in a [`Precondition`](crate::Precondition) to make a
/// commit fail if anyone wrote the record in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    /// The record, if it exists
    pub value: Option<T>,
    /// Version the record was read at
    pub version: Version,
}

impl<T> Versioned<T> {
    /// An absent record
    pub fn absent() -> Self {
        Self {
            value: None,
            version: ABSENT,
        }
    }

    /// A present record
    pub fn present(value: T, version: Version) -> Self {
        Self {
            value: Some(value),
            version,
        }
    }

    /// Check if the record exists
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    /// Map the record, keeping the version
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Versioned<U> {
        Versioned {
            value: self.value.map(f),
            version: self.version,
        }
    }
}
