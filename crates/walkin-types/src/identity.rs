//! Caller identity as handed over by the authentication provider
//!
//! The queue never verifies anything itself. Whatever sits in front of it
//! (phone/OTP login, staff SSO, ...) turns a verified session into a
//! [`Caller::Verified`]; everything else is [`Caller::Anonymous`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QueueError, QueueResult};

/// Opaque reference to an authenticated requester
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerIdentity(String);

impl OwnerIdentity {
    /// Wrap an identity string from the auth provider
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identity string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A verified session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Verified identity
    pub owner: OwnerIdentity,
    /// Verified contact handle (phone number), if the provider supplies one
    pub contact: Option<String>,
}

impl Session {
    /// Create a session for an identity
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: OwnerIdentity::new(owner),
            contact: None,
        }
    }

    /// Attach the verified contact handle
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }
}

/// Whoever is invoking an operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Caller {
    /// No session
    #[default]
    Anonymous,
    /// Session verified by the auth provider
    Verified(Session),
}

impl Caller {
    /// Shorthand for a verified caller with a contact handle
    pub fn verified(owner: impl Into<String>, contact: impl Into<String>) -> Self {
        Self::Verified(Session::new(owner).with_contact(contact))
    }

    /// The verified session, or `Unauthenticated`
    ///
    /// A session with a blank identity is treated as no session at all.
    pub fn session(&self) -> QueueResult<&Session> {
        match self {
            Self::Verified(session) if !session.owner.as_str().trim().is_empty() => Ok(session),
            _ => Err(QueueError::Unauthenticated),
        }
    }

    /// Check if a usable session is present
    pub fn is_authenticated(&self) -> bool {
        self.session().is_ok()
    }
}

impl From<Session> for Caller {
    fn from(session: Session) -> Self {
        Self::Verified(session)
    }
}
