//! Service Builder Pattern
//!
//! Provides a fluent builder API for configuring a [`QueueService`] with
//! sensible defaults and validation.
//!
//! # Example
//!
//! ```
//! use walkin_sdk::builder::QueueServiceBuilder;
//! use walkin_sdk::prelude::*;
//!
//! let service = QueueServiceBuilder::new()
//!     .with_max_attempts(8)
//!     .with_service_minutes(Service::Shave, 25)
//!     .with_transition_policy(TransitionPolicy::Strict)
//!     .build()
//!     .unwrap();
//! assert_eq!(service.calculator().table().duration_for(Service::Shave), 25);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use walkin_queue::{DurationTable, EtaCalculator, EtaMode, TransitionPolicy};
use walkin_store::{DocumentStore, MemoryStore, RetryConfig};
use walkin_types::Service;

use crate::clock::{Clock, SystemClock};
use crate::config::ServiceConfig;
use crate::service::QueueService;

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable could not be parsed
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    /// Retry budget of zero
    #[error("max attempts must be at least 1")]
    ZeroAttempts,

    /// Backoff that shrinks
    #[error("backoff multiplier must be at least 1.0, got {multiplier}")]
    InvalidBackoff { multiplier: f64 },

    /// Service configured to take no time
    #[error("duration for {service} must be positive")]
    ZeroDuration { service: String },
}

/// Builder for configuring a queue service
///
/// Provides a fluent API for:
/// - Storage backend and clock
/// - Conflict retry policy
/// - Service duration table and ETA mode
/// - Status transition policy
#[derive(Clone)]
pub struct QueueServiceBuilder {
    /// Storage backend (in-memory if unset)
    pub store: Option<Arc<dyn DocumentStore>>,

    /// Clock (system local clock if unset)
    pub clock: Option<Arc<dyn Clock>>,

    /// Conflict retry policy
    pub retry: RetryConfig,

    /// Per-service durations
    pub durations: DurationTable,

    /// How wait estimates are derived
    pub eta_mode: EtaMode,

    /// Which status changes are allowed
    pub transition_policy: TransitionPolicy,
}

impl Default for QueueServiceBuilder {
    fn default() -> Self {
        Self {
            store: None,
            clock: None,
            retry: RetryConfig::default(),
            durations: DurationTable::standard(),
            eta_mode: EtaMode::default(),
            transition_policy: TransitionPolicy::default(),
        }
    }
}

impl fmt::Debug for QueueServiceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueServiceBuilder")
            .field("store", &self.store.as_ref().map(|s| s.name().to_string()))
            .field("custom_clock", &self.clock.is_some())
            .field("retry", &self.retry)
            .field("durations", &self.durations)
            .field("eta_mode", &self.eta_mode)
            .field("transition_policy", &self.transition_policy)
            .finish()
    }
}

impl QueueServiceBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with overrides from the environment applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new().with_config(ServiceConfig::from_env()?))
    }

    /// Apply environment overrides
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        if let Some(max) = config.max_attempts {
            // Keep zero so validate() reports it
            self.retry.max_attempts = max;
        }
        if let Some(delay) = config.retry_initial_delay {
            self.retry = self.retry.with_initial_delay(delay);
        }
        if let Some(minutes) = config.default_minutes {
            self.durations = self.durations.with_default_minutes(minutes);
        }
        if let Some(policy) = config.transition_policy {
            self.transition_policy = policy;
        }
        self
    }

    /// Set the storage backend
    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the retry configuration
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the number of commit attempts per booking
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.retry = self.retry.with_max_attempts(max);
        self
    }

    /// Set the initial backoff delay
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry = self.retry.with_initial_delay(delay);
        self
    }

    /// Replace the duration table
    pub fn with_durations(mut self, durations: DurationTable) -> Self {
        self.durations = durations;
        self
    }

    /// Set the duration of one service
    pub fn with_service_minutes(mut self, service: Service, minutes: u32) -> Self {
        self.durations = self.durations.with_minutes(service, minutes);
        self
    }

    /// Set the duration for services without an entry
    pub fn with_default_minutes(mut self, minutes: u32) -> Self {
        self.durations = self.durations.with_default_minutes(minutes);
        self
    }

    /// Set the ETA mode
    pub fn with_eta_mode(mut self, mode: EtaMode) -> Self {
        self.eta_mode = mode;
        self
    }

    /// Set the transition policy
    pub fn with_transition_policy(mut self, policy: TransitionPolicy) -> Self {
        self.transition_policy = policy;
        self
    }

    /// Only allow status changes along the state machine
    pub fn strict_transitions(self) -> Self {
        self.with_transition_policy(TransitionPolicy::Strict)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }

        if self.retry.multiplier < 1.0 {
            return Err(ConfigError::InvalidBackoff {
                multiplier: self.retry.multiplier,
            });
        }

        if let Some(zero) = self.durations.zero_entry() {
            return Err(ConfigError::ZeroDuration {
                service: zero.map_or_else(|| "default".to_string(), |s| s.to_string()),
            });
        }

        Ok(())
    }

    /// Validate and build the service
    pub fn build(self) -> Result<QueueService, ConfigError> {
        self.validate()?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn DocumentStore>);
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        let calculator = EtaCalculator::new(self.durations).with_mode(self.eta_mode);

        Ok(QueueService::from_parts(
            store,
            clock,
            self.retry,
            calculator,
            self.transition_policy,
        ))
    }
}
