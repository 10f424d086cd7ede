//! Gatekeeper configuration

use crate::GatekeeperError;
use serde::{Deserialize, Serialize};

/// Configuration for validation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Exact number of keywords the detailed stage must produce
    pub required_keywords: usize,

    /// Minimum keywords that must appear (case-insensitively) in the long summary
    pub min_keyword_hits: usize,

    /// Optional inclusive character bounds on the long summary
    pub long_summary_bounds: Option<(usize, usize)>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            required_keywords: 5,
            min_keyword_hits: 4,
            long_summary_bounds: None,
        }
    }
}

impl ValidationConfig {
    /// Lenient configuration: coverage threshold lowered to 3 of 5
    pub fn lenient() -> Self {
        Self {
            min_keyword_hits: 3,
            ..Self::default()
        }
    }

    /// Aggressive configuration: all keywords present and a 900-1100 character summary
    pub fn aggressive() -> Self {
        Self {
            required_keywords: 5,
            min_keyword_hits: 5,
            long_summary_bounds: Some((900, 1100)),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if self.required_keywords == 0 {
            return Err(GatekeeperError::Config(
                "required_keywords must be greater than 0".to_string(),
            ));
        }
        if self.min_keyword_hits > self.required_keywords {
            return Err(GatekeeperError::Config(format!(
                "min_keyword_hits ({}) cannot exceed required_keywords ({})",
                self.min_keyword_hits, self.required_keywords
            )));
        }
        if let Some((min, max)) = self.long_summary_bounds {
            if min > max {
                return Err(GatekeeperError::Config(format!(
                    "long_summary_bounds minimum {} exceeds maximum {}",
                    min, max
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.required_keywords, 5);
        assert_eq!(config.min_keyword_hits, 4);
        assert!(config.long_summary_bounds.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ValidationConfig::lenient().validate().is_ok());
        assert!(ValidationConfig::aggressive().validate().is_ok());
        assert_eq!(ValidationConfig::aggressive().long_summary_bounds, Some((900, 1100)));
    }

    #[test]
    fn test_threshold_above_count_is_invalid() {
        let config = ValidationConfig {
            min_keyword_hits: 6,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_bounds_are_invalid() {
        let config = ValidationConfig {
            long_summary_bounds: Some((1100, 900)),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
