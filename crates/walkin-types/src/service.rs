//! Bookable services

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueueError;

/// The fixed set of services a customer can book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Service {
    /// Haircut
    Haircut,
    /// Beard trim
    #[serde(rename = "Beard Trim")]
    BeardTrim,
    /// Shave
    Shave,
}

impl Service {
    /// Every service, in menu order
    pub const ALL: [Service; 3] = [Self::Haircut, Self::BeardTrim, Self::Shave];

    /// Returns the display name as stored on booking records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Haircut => "Haircut",
            Self::BeardTrim => "Beard Trim",
            Self::Shave => "Shave",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = QueueError;

    /// Accepts the display name, case-insensitively, with `_` or `-` in place of spaces
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "haircut" => Ok(Self::Haircut),
            "beard trim" => Ok(Self::BeardTrim),
            "shave" => Ok(Self::Shave),
            _ => Err(QueueError::invalid_input(
                "service",
                format!("{s:?} is not one of Haircut, Beard Trim, Shave"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("Haircut".parse::<Service>().unwrap(), Service::Haircut);
        assert_eq!("beard trim".parse::<Service>().unwrap(), Service::BeardTrim);
        assert_eq!("BEARD_TRIM".parse::<Service>().unwrap(), Service::BeardTrim);
        assert_eq!(" shave ".parse::<Service>().unwrap(), Service::Shave);

        let err = "Massage".parse::<Service>().unwrap_err();
        assert!(matches!(err, QueueError::InvalidInput { field: "service", .. }));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Service::BeardTrim).unwrap();
        assert_eq!(json, r#""Beard Trim""#);
        for service in Service::ALL {
            let json = serde_json::to_string(&service).unwrap();
            assert_eq!(json, format!("\"{}\"", service.as_str()));
        }
    }
}
