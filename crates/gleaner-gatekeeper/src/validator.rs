//! Stage validation logic

use crate::timestamp::{parse_timestamp, TimestampError};
use crate::ValidationConfig;
use chrono::NaiveDateTime;
use gleaner_domain::{BasicFields, DetailedFields};

/// Result of validating one stage's output
///
/// `value` carries what the validator derived from the fields when they were
/// accepted (the parsed timestamp, the keyword coverage).
#[derive(Debug, Clone)]
pub struct ValidationResult<T> {
    /// Whether the fields passed validation
    pub status: ValidationStatus,

    /// Rejection reasons (if any)
    pub reasons: Vec<RejectionReason>,

    /// Derived value, present only when accepted
    pub value: Option<T>,
}

impl<T> ValidationResult<T> {
    fn accepted(value: T) -> Self {
        Self {
            status: ValidationStatus::Accepted,
            reasons: Vec::new(),
            value: Some(value),
        }
    }

    fn rejected(reasons: Vec<RejectionReason>) -> Self {
        Self {
            status: ValidationStatus::Rejected,
            reasons,
            value: None,
        }
    }

    /// Whether the fields were accepted
    pub fn is_accepted(&self) -> bool {
        self.status == ValidationStatus::Accepted
    }

    /// Human-readable rejection summary
    pub fn reason_summary(&self) -> String {
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Fields accepted
    Accepted,

    /// Fields rejected; the stage spends one attempt
    Rejected,
}

/// Reasons for rejection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The oracle produced no publish timestamp
    MissingTimestamp,

    /// The publish timestamp did not parse
    InvalidTimestamp {
        /// Raw value from the oracle
        value: String,
        /// Parse error
        error: TimestampError,
    },

    /// Wrong number of keywords
    KeywordCount {
        /// Required count
        expected: usize,
        /// Count received
        actual: usize,
    },

    /// Too few keywords appear in the long summary
    KeywordCoverage {
        /// Keywords found
        found: usize,
        /// Minimum required
        required: usize,
        /// Keywords that were not found
        missing: Vec<String>,
    },

    /// Long summary length outside the configured bounds
    SummaryLength {
        /// Length in characters
        len: usize,
        /// Lower bound
        min: usize,
        /// Upper bound
        max: usize,
    },
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::MissingTimestamp => write!(f, "published_date missing"),
            RejectionReason::InvalidTimestamp { error, .. } => write!(f, "{}", error),
            RejectionReason::KeywordCount { expected, actual } => {
                write!(f, "expected {} keywords, got {}", expected, actual)
            }
            RejectionReason::KeywordCoverage { found, required, missing } => write!(
                f,
                "{} keywords found in summary, {} required (missing: {})",
                found,
                required,
                missing.join(", ")
            ),
            RejectionReason::SummaryLength { len, min, max } => {
                write!(f, "summary length {} outside {}..={}", len, min, max)
            }
        }
    }
}

/// Keyword coverage of an accepted long summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCoverage {
    /// Keywords found in the summary
    pub found: usize,
    /// Keywords checked
    pub total: usize,
}

/// The Gatekeeper validates oracle output before it moves to the next stage
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate basic fields
    ///
    /// Only the publish timestamp is checked. Missing title or summary are
    /// stored as empty strings downstream.
    pub fn validate_basic(&self, fields: &BasicFields) -> ValidationResult<NaiveDateTime> {
        let Some(raw) = fields.published_at.as_deref() else {
            return ValidationResult::rejected(vec![RejectionReason::MissingTimestamp]);
        };

        match parse_timestamp(raw) {
            Ok(dt) => ValidationResult::accepted(dt),
            Err(TimestampError::Empty) => {
                ValidationResult::rejected(vec![RejectionReason::MissingTimestamp])
            }
            Err(error) => ValidationResult::rejected(vec![RejectionReason::InvalidTimestamp {
                value: raw.to_string(),
                error,
            }]),
        }
    }

    /// Validate detailed fields
    ///
    /// A wrong keyword count rejects outright without looking at the summary.
    /// Otherwise each keyword counts once if it occurs anywhere in the summary,
    /// compared case-insensitively.
    pub fn validate_detailed(&self, fields: &DetailedFields) -> ValidationResult<KeywordCoverage> {
        let expected = self.config.required_keywords;
        if fields.keywords.len() != expected {
            return ValidationResult::rejected(vec![RejectionReason::KeywordCount {
                expected,
                actual: fields.keywords.len(),
            }]);
        }

        let mut reasons = Vec::new();

        let (found, missing) = partition_keywords(&fields.long_summary, &fields.keywords);
        if found < self.config.min_keyword_hits {
            reasons.push(RejectionReason::KeywordCoverage {
                found,
                required: self.config.min_keyword_hits,
                missing,
            });
        }

        if let Some((min, max)) = self.config.long_summary_bounds {
            let len = fields.long_summary.chars().count();
            if len < min || len > max {
                reasons.push(RejectionReason::SummaryLength { len, min, max });
            }
        }

        if reasons.is_empty() {
            ValidationResult::accepted(KeywordCoverage {
                found,
                total: fields.keywords.len(),
            })
        } else {
            ValidationResult::rejected(reasons)
        }
    }
}

impl Default for Gatekeeper {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Number of keywords occurring in `text`, case-insensitively
///
/// Blank keywords never count as present.
pub fn count_keyword_hits(text: &str, keywords: &[String]) -> usize {
    partition_keywords(text, keywords).0
}

fn partition_keywords(text: &str, keywords: &[String]) -> (usize, Vec<String>) {
    let haystack = text.to_lowercase();
    let mut found = 0;
    let mut missing = Vec::new();
    for keyword in keywords {
        let needle = keyword.trim().to_lowercase();
        if !needle.is_empty() && haystack.contains(&needle) {
            found += 1;
        } else {
            missing.push(keyword.clone());
        }
    }
    (found, missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn basic(published_at: Option<&str>) -> BasicFields {
        BasicFields {
            title: Some("T".to_string()),
            short_summary: Some("S".to_string()),
            published_at: published_at.map(String::from),
        }
    }

    fn detailed(summary: &str, keywords: &[&str]) -> DetailedFields {
        DetailedFields {
            long_summary: summary.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_basic_accepts_minute_timestamp() {
        let gatekeeper = Gatekeeper::default_config();
        let result = gatekeeper.validate_basic(&basic(Some("2025-02-24T09:30")));
        assert!(result.is_accepted());
        assert_eq!(
            result.value.map(|dt| crate::format_published_at(&dt)),
            Some("2025-02-24T09:30".to_string())
        );
    }

    #[test]
    fn test_basic_rejects_bad_timestamps() {
        let gatekeeper = Gatekeeper::default_config();

        let result = gatekeeper.validate_basic(&basic(Some("not-a-date")));
        assert_eq!(result.status, ValidationStatus::Rejected);
        assert!(matches!(
            result.reasons[0],
            RejectionReason::InvalidTimestamp { .. }
        ));

        let result = gatekeeper.validate_basic(&basic(Some("")));
        assert_eq!(result.reasons, vec![RejectionReason::MissingTimestamp]);

        let result = gatekeeper.validate_basic(&basic(None));
        assert_eq!(result.reasons, vec![RejectionReason::MissingTimestamp]);
    }

    #[test]
    fn test_basic_ignores_missing_title() {
        let gatekeeper = Gatekeeper::default_config();
        let fields = BasicFields {
            title: None,
            short_summary: None,
            published_at: Some("2025-02-24T09:30".to_string()),
        };
        assert!(gatekeeper.validate_basic(&fields).is_accepted());
    }

    #[test]
    fn test_detailed_four_of_five_accepted() {
        let gatekeeper = Gatekeeper::default_config();
        let fields = detailed(
            "Rust and Tokio power the new Parser, with a fresh Compiler.",
            &["rust", "tokio", "parser", "compiler", "garbage"],
        );
        let result = gatekeeper.validate_detailed(&fields);
        assert!(result.is_accepted());
        assert_eq!(result.value, Some(KeywordCoverage { found: 4, total: 5 }));
    }

    #[test]
    fn test_detailed_two_of_five_rejected() {
        let gatekeeper = Gatekeeper::default_config();
        let fields = detailed("rust and tokio", &["rust", "tokio", "a1", "b2", "c3"]);
        let result = gatekeeper.validate_detailed(&fields);
        assert_eq!(result.status, ValidationStatus::Rejected);
        assert_eq!(
            result.reasons,
            vec![RejectionReason::KeywordCoverage {
                found: 2,
                required: 4,
                missing: vec!["a1".to_string(), "b2".to_string(), "c3".to_string()],
            }]
        );
    }

    #[test]
    fn test_detailed_wrong_count_rejected_regardless_of_coverage() {
        let gatekeeper = Gatekeeper::default_config();
        let fields = detailed("alpha beta gamma delta", &["alpha", "beta", "gamma", "delta"]);
        let result = gatekeeper.validate_detailed(&fields);
        assert_eq!(
            result.reasons,
            vec![RejectionReason::KeywordCount { expected: 5, actual: 4 }]
        );
    }

    #[test]
    fn test_summary_length_bound() {
        let gatekeeper = Gatekeeper::new(ValidationConfig {
            long_summary_bounds: Some((10, 20)),
            ..Default::default()
        });
        let fields = detailed(
            "a b c d e and then far too much text",
            &["a", "b", "c", "d", "e"],
        );
        let result = gatekeeper.validate_detailed(&fields);
        assert!(matches!(
            result.reasons.as_slice(),
            [RejectionReason::SummaryLength { min: 10, max: 20, .. }]
        ));
    }

    #[test]
    fn test_blank_keyword_never_counts() {
        let keywords = vec!["".to_string(), "  ".to_string(), "x".to_string()];
        assert_eq!(count_keyword_hits("x marks the spot", &keywords), 1);
    }

    proptest! {
        #[test]
        fn prop_wrong_count_always_rejected(n in 0usize..12, summary in ".{0,200}") {
            prop_assume!(n != 5);
            let gatekeeper = Gatekeeper::default_config();
            let fields = DetailedFields {
                long_summary: summary,
                keywords: (0..n).map(|i| format!("k{}", i)).collect(),
            };
            let result = gatekeeper.validate_detailed(&fields);
            prop_assert_eq!(result.status, ValidationStatus::Rejected);
            let is_count_reason = matches!(result.reasons[0], RejectionReason::KeywordCount { .. });
            prop_assert!(is_count_reason);
        }
    }
}
