//! Environment configuration
//!
//! | Variable                  | Meaning                                 |
//! |---------------------------|-----------------------------------------|
//! | `WALKIN_MAX_ATTEMPTS`     | commit attempts per booking (>= 1)      |
//! | `WALKIN_RETRY_INITIAL_MS` | first backoff delay in milliseconds     |
//! | `WALKIN_DEFAULT_MINUTES`  | duration for services without an entry  |
//! | `WALKIN_STRICT_STATUS`    | `true`/`1` enables strict transitions   |

use std::time::Duration;
use walkin_queue::TransitionPolicy;

use crate::builder::ConfigError;

/// Commit attempts per booking
pub const ENV_MAX_ATTEMPTS: &str = "WALKIN_MAX_ATTEMPTS";
/// First backoff delay in milliseconds
pub const ENV_RETRY_INITIAL_MS: &str = "WALKIN_RETRY_INITIAL_MS";
/// Fallback service duration in minutes
pub const ENV_DEFAULT_MINUTES: &str = "WALKIN_DEFAULT_MINUTES";
/// Strict transition policy toggle
pub const ENV_STRICT_STATUS: &str = "WALKIN_STRICT_STATUS";

/// Overrides read from the environment
///
/// Unset variables leave the builder defaults alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceConfig {
    /// Commit attempts per booking
    pub max_attempts: Option<u32>,
    /// First backoff delay
    pub retry_initial_delay: Option<Duration>,
    /// Fallback service duration
    pub default_minutes: Option<u32>,
    /// Transition policy
    pub transition_policy: Option<TransitionPolicy>,
}

impl ServiceConfig {
    /// Read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max_attempts = parse_var(&lookup, ENV_MAX_ATTEMPTS, |v| v.parse::<u32>().ok())?;
        let retry_initial_delay = parse_var(&lookup, ENV_RETRY_INITIAL_MS, |v| {
            v.parse::<u64>().ok().map(Duration::from_millis)
        })?;
        let default_minutes = parse_var(&lookup, ENV_DEFAULT_MINUTES, |v| v.parse::<u32>().ok())?;
        let transition_policy = parse_var(&lookup, ENV_STRICT_STATUS, |v| {
            match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Some(TransitionPolicy::Strict),
                "0" | "false" | "no" | "off" => Some(TransitionPolicy::Permissive),
                _ => None,
            }
        })?;

        Ok(Self {
            max_attempts,
            retry_initial_delay,
            default_minutes,
            transition_policy,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            parse(trimmed)
                .map(Some)
                .ok_or(ConfigError::InvalidEnv { var, value: raw })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_all_variables() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (ENV_MAX_ATTEMPTS, "8"),
            (ENV_RETRY_INITIAL_MS, "25"),
            (ENV_DEFAULT_MINUTES, "18"),
            (ENV_STRICT_STATUS, "TRUE"),
        ]))
        .unwrap();

        assert_eq!(config.max_attempts, Some(8));
        assert_eq!(config.retry_initial_delay, Some(Duration::from_millis(25)));
        assert_eq!(config.default_minutes, Some(18));
        assert_eq!(config.transition_policy, Some(TransitionPolicy::Strict));
    }

    #[test]
    fn test_invalid_value() {
        let err = ServiceConfig::from_lookup(lookup(&[(ENV_MAX_ATTEMPTS, "lots")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                var: ENV_MAX_ATTEMPTS,
                ..
            }
        ));
    }
}
