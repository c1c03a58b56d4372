//! Log level definitions
//!
//! Levels are ordered by their numeric value:
//! `None < Mute < Error < Warning < Info < Debug < Custom(..) < Print`.
//! Values in `[CUSTOM, PRINT)` are free for user-defined severities.

use super::error::LoggerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogLevel(u8);

impl LogLevel {
    /// Undefined level. Events at this level are never delivered.
    pub const NONE: LogLevel = LogLevel(0);
    /// Silences the logger when used as a threshold.
    pub const MUTE: LogLevel = LogLevel(1);
    pub const ERROR: LogLevel = LogLevel(2);
    pub const WARNING: LogLevel = LogLevel(3);
    pub const INFO: LogLevel = LogLevel(4);
    pub const DEBUG: LogLevel = LogLevel(5);
    /// First user-defined level. Define more with `LogLevel::custom(n)`.
    pub const CUSTOM: LogLevel = LogLevel(6);
    /// Delivered at any threshold above `MUTE`.
    pub const PRINT: LogLevel = LogLevel(255);

    /// Build a level from its raw value.
    pub const fn from_u8(value: u8) -> Self {
        LogLevel(value)
    }

    /// A user-defined level `offset` steps above `CUSTOM`.
    ///
    /// Returns `None` if the result would reach `PRINT`.
    pub fn custom(offset: u8) -> Option<Self> {
        Self::CUSTOM
            .0
            .checked_add(offset)
            .filter(|v| *v < Self::PRINT.0)
            .map(LogLevel)
    }

    pub const fn as_u8(self) -> u8 {
        self.0
    }

    pub fn is_custom(self) -> bool {
        self >= Self::CUSTOM && self < Self::PRINT
    }

    /// Whether an event at this level passes the threshold `threshold`.
    ///
    /// `None`/`Mute` thresholds suppress everything, `None`/`Mute` events are
    /// never delivered, `Print` passes any other threshold, and every other
    /// level passes when it is at or below the threshold.
    pub fn enabled_at(self, threshold: LogLevel) -> bool {
        if threshold <= Self::MUTE || self <= Self::MUTE {
            return false;
        }
        self == Self::PRINT || self <= threshold
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match *self {
            LogLevel::ERROR => Red,
            LogLevel::WARNING => Yellow,
            LogLevel::INFO => Green,
            LogLevel::DEBUG => Blue,
            LogLevel::PRINT => White,
            level if level.is_custom() => Magenta,
            _ => BrightBlack,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::DEBUG
    }
}

impl From<u8> for LogLevel {
    fn from(value: u8) -> Self {
        LogLevel(value)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            LogLevel::NONE => f.write_str("None"),
            LogLevel::MUTE => f.write_str("Mute"),
            LogLevel::ERROR => f.write_str("Error"),
            LogLevel::WARNING => f.write_str("Warning"),
            LogLevel::INFO => f.write_str("Info"),
            LogLevel::DEBUG => f.write_str("Debug"),
            LogLevel::PRINT => f.write_str("Print"),
            LogLevel(n) => write!(f, "Custom({})", n),
        }
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "none" => Ok(LogLevel::NONE),
            "mute" => Ok(LogLevel::MUTE),
            "error" => Ok(LogLevel::ERROR),
            "warning" => Ok(LogLevel::WARNING),
            "info" => Ok(LogLevel::INFO),
            "debug" => Ok(LogLevel::DEBUG),
            "print" => Ok(LogLevel::PRINT),
            other => other
                .strip_prefix("custom(")
                .and_then(|rest| rest.strip_suffix(')'))
                .and_then(|n| n.trim().parse::<u8>().ok())
                .map(LogLevel)
                .filter(|level| level.is_custom())
                .ok_or_else(|| LoggerError::unmarshal_level(s)),
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        assert_eq!(LogLevel::NONE.to_string(), "None");
        assert_eq!(LogLevel::MUTE.to_string(), "Mute");
        assert_eq!(LogLevel::ERROR.to_string(), "Error");
        assert_eq!(LogLevel::WARNING.to_string(), "Warning");
        assert_eq!(LogLevel::INFO.to_string(), "Info");
        assert_eq!(LogLevel::DEBUG.to_string(), "Debug");
        assert_eq!(LogLevel::PRINT.to_string(), "Print");
    }

    #[test]
    fn test_custom_encoding() {
        let level = LogLevel::custom(4).unwrap();
        assert_eq!(level.to_string(), "Custom(10)");
        assert_eq!("Custom(10)".parse::<LogLevel>().unwrap(), level);
        assert_eq!("custom( 10 )".parse::<LogLevel>().unwrap(), level);
        assert!(LogLevel::custom(249).is_none());
        assert_eq!(LogLevel::custom(248), Some(LogLevel::from_u8(254)));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::WARNING);
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::INFO);
        assert_eq!("pRiNt".parse::<LogLevel>().unwrap(), LogLevel::PRINT);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in ["", "loud", "custom", "custom(", "custom(x)", "custom(3)", "custom(255)", "Custom 7"] {
            let err = text.parse::<LogLevel>().unwrap_err();
            assert!(
                matches!(err, LoggerError::UnmarshalLevel { text: ref t } if t == text),
                "unexpected result for {:?}",
                text
            );
        }
    }

    #[test]
    fn test_ordering() {
        assert!(LogLevel::NONE < LogLevel::MUTE);
        assert!(LogLevel::MUTE < LogLevel::ERROR);
        assert!(LogLevel::ERROR < LogLevel::WARNING);
        assert!(LogLevel::WARNING < LogLevel::INFO);
        assert!(LogLevel::INFO < LogLevel::DEBUG);
        assert!(LogLevel::DEBUG < LogLevel::CUSTOM);
        assert!(LogLevel::CUSTOM < LogLevel::PRINT);
    }

    #[test]
    fn test_gate_boundaries() {
        assert!(LogLevel::ERROR.enabled_at(LogLevel::INFO));
        assert!(LogLevel::INFO.enabled_at(LogLevel::INFO));
        assert!(!LogLevel::DEBUG.enabled_at(LogLevel::INFO));
        assert!(!LogLevel::DEBUG.enabled_at(LogLevel::ERROR));

        assert!(LogLevel::PRINT.enabled_at(LogLevel::ERROR));
        assert!(!LogLevel::PRINT.enabled_at(LogLevel::MUTE));
        assert!(!LogLevel::PRINT.enabled_at(LogLevel::NONE));
        assert!(!LogLevel::ERROR.enabled_at(LogLevel::MUTE));

        assert!(!LogLevel::NONE.enabled_at(LogLevel::PRINT));
        assert!(!LogLevel::MUTE.enabled_at(LogLevel::PRINT));

        let custom = LogLevel::custom(2).unwrap();
        assert!(!custom.enabled_at(LogLevel::DEBUG));
        assert!(custom.enabled_at(LogLevel::PRINT));
        assert!(custom.enabled_at(custom));
        assert!(LogLevel::DEBUG.enabled_at(custom));
    }

    #[test]
    fn test_serde_uses_text_encoding() {
        let json = serde_json::to_string(&LogLevel::WARNING).unwrap();
        assert_eq!(json, "\"Warning\"");

        let level: LogLevel = serde_json::from_str("\"Custom(42)\"").unwrap();
        assert_eq!(level, LogLevel::from_u8(42));

        assert!(serde_json::from_str::<LogLevel>("\"verbose\"").is_err());
    }
}
