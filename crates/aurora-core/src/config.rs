//! Board identity as seen by the phone app.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Service the app scans for to recognize a board.
pub const ADVERTISING_SERVICE_UUID: &str = "4488B571-7806-4DF6-BCFF-A2897E4953FF";
/// Service carrying the data-transfer characteristic.
pub const DATA_TRANSFER_SERVICE_UUID: &str = "6E400001-B5A3-F393-E0A9-E50E24DCCA9E";
/// Write-only characteristic the frames arrive on.
pub const DATA_TRANSFER_CHARACTERISTIC_UUID: &str = "6E400002-B5A3-F393-E0A9-E50E24DCCA9E";

pub const DEFAULT_DISPLAY_NAME: &str = "Aurora Board";
/// API level 3 and above use the framed protocol decoded by this crate.
pub const DEFAULT_API_LEVEL: u8 = 3;
pub const DEFAULT_LED_COUNT: u16 = 500;

/// Advertised names are capped so `name@level` fits a legacy advertising payload.
pub const MAX_DISPLAY_NAME_LEN: usize = 29;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("display name must not be empty")]
    EmptyName,
    #[error("display name is too long: {len} characters (max {max})")]
    NameTooLong { len: usize, max: usize },
    #[error("display name must be alphanumeric, found {found:?}")]
    InvalidNameChar { found: char },
    #[error("API level must be a single non-zero digit, got {level}")]
    InvalidApiLevel { level: u8 },
    #[error("LED count must be at least 1")]
    NoLeds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub display_name: String,
    pub api_level: u8,
    pub led_count: u16,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            api_level: DEFAULT_API_LEVEL,
            led_count: DEFAULT_LED_COUNT,
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.display_name.as_str();
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        let len = name.chars().count();
        if len > MAX_DISPLAY_NAME_LEN {
            return Err(ConfigError::NameTooLong {
                len,
                max: MAX_DISPLAY_NAME_LEN,
            });
        }
        if let Some(found) = name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != ' ') {
            return Err(ConfigError::InvalidNameChar { found });
        }
        if !(1..=9).contains(&self.api_level) {
            return Err(ConfigError::InvalidApiLevel {
                level: self.api_level,
            });
        }
        if self.led_count == 0 {
            return Err(ConfigError::NoLeds);
        }
        Ok(())
    }

    /// Name the app lists: display name and API level joined by `@`.
    pub fn advertised_name(&self) -> String {
        format!("{}@{}", self.display_name, self.api_level)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, ConfigError};

    fn config(name: &str, api_level: u8, led_count: u16) -> BoardConfig {
        BoardConfig {
            display_name: name.to_string(),
            api_level,
            led_count,
        }
    }

    #[test]
    fn default_is_valid() {
        let board = BoardConfig::default();
        assert_eq!(board.validate(), Ok(()));
        assert_eq!(board.advertised_name(), "Aurora Board@3");
    }

    #[test]
    fn spaces_are_allowed_in_names() {
        assert_eq!(config("TK Lielahti Kilter", 3, 500).validate(), Ok(()));
    }

    #[test]
    fn rejects_punctuation() {
        assert_eq!(
            config("Board@Home", 3, 500).validate(),
            Err(ConfigError::InvalidNameChar { found: '@' })
        );
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            config("Board", 0, 500).validate(),
            Err(ConfigError::InvalidApiLevel { level: 0 })
        );
        assert_eq!(
            config("Board", 10, 500).validate(),
            Err(ConfigError::InvalidApiLevel { level: 10 })
        );
        assert_eq!(config("Board", 3, 0).validate(), Err(ConfigError::NoLeds));
        assert_eq!(config("  ", 3, 1).validate(), Err(ConfigError::EmptyName));
    }

    #[test]
    fn rejects_long_names() {
        let name = "A".repeat(30);
        assert_eq!(
            config(&name, 3, 1).validate(),
            Err(ConfigError::NameTooLong { len: 30, max: 29 })
        );
    }
}
