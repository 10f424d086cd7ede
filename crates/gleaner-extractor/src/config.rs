//! Configuration for the oracle client

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the oracle client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Page text beyond this many characters is cut before prompting
    pub max_content_chars: usize,

    /// Maximum time for a single oracle call (seconds)
    pub timeout_secs: u64,
}

impl OracleConfig {
    /// Get the call timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_content_chars == 0 {
            return Err("max_content_chars must be greater than 0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Aggressive preset: less context, shorter wait
    pub fn aggressive() -> Self {
        Self {
            max_content_chars: 20_000,
            timeout_secs: 60,
        }
    }

    /// Lenient preset: more context, longer wait
    pub fn lenient() -> Self {
        Self {
            max_content_chars: 100_000,
            timeout_secs: 300,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            max_content_chars: 50_000,
            timeout_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(OracleConfig::default().validate().is_ok());
        assert!(OracleConfig::aggressive().validate().is_ok());
        assert!(OracleConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = OracleConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = OracleConfig::from_toml("timeout_secs = 30").unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_content_chars, 50_000);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }
}
