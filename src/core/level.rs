//! Severity level definitions

use super::error::LogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed, closed set of severity levels, most severe first.
///
/// The lowercase names returned by [`Level::as_str`] are the wire/display
/// form and appear verbatim in rendered output (e.g. `[info]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

/// All levels in descending urgency, in validation-message order.
pub const LEVELS: [Level; 8] = [
    Level::Emergency,
    Level::Alert,
    Level::Critical,
    Level::Error,
    Level::Warning,
    Level::Notice,
    Level::Info,
    Level::Debug,
];

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Emergency => "emergency",
            Level::Alert => "alert",
            Level::Critical => "critical",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Notice => "notice",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emergency" => Ok(Level::Emergency),
            "alert" => Ok(Level::Alert),
            "critical" => Ok(Level::Critical),
            "error" => Ok(Level::Error),
            "warning" => Ok(Level::Warning),
            "notice" => Ok(Level::Notice),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            _ => Err(LogError::invalid_level(s)),
        }
    }
}

/// Validate a level string against the fixed severity set.
///
/// Single source of truth for level validation; every string-accepting entry
/// point routes through it.
pub fn validate_level(level: &str) -> Result<Level, LogError> {
    level.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_all_levels() {
        for level in LEVELS {
            assert_eq!(validate_level(level.as_str()).unwrap(), level);
        }
    }

    #[test]
    fn test_validate_rejects_unknown() {
        for bad in ["unknown", "INFO", "Warning", "", "1", "warn "] {
            assert!(matches!(
                validate_level(bad),
                Err(LogError::InvalidLevel { .. })
            ));
        }
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(Level::Emergency.to_string(), "emergency");
        assert_eq!(Level::Debug.to_string(), "debug");
    }

    #[test]
    fn test_ordering_follows_urgency() {
        assert!(Level::Emergency < Level::Alert);
        assert!(Level::Error < Level::Warning);
        assert!(Level::Info < Level::Debug);
    }
}
