//! Analyzer configuration

use crate::error::ComputeError;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Default gap between consecutive readings before a segment is split (5 minutes)
pub const DEFAULT_GAP_THRESHOLD_SECS: i64 = 300;

/// Largest threshold representable as a `chrono::Duration`
const MAX_GAP_THRESHOLD_SECS: i64 = i64::MAX / 1_000;

/// Tunable parameters for segmentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Readings in the same region further apart than this start a new segment
    #[serde(default = "default_gap_threshold_secs")]
    pub gap_threshold_secs: i64,
}

fn default_gap_threshold_secs() -> i64 {
    DEFAULT_GAP_THRESHOLD_SECS
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            gap_threshold_secs: DEFAULT_GAP_THRESHOLD_SECS,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_gap_secs(gap_threshold_secs: i64) -> Self {
        Self { gap_threshold_secs }
    }

    pub fn with_gap_minutes(minutes: i64) -> Self {
        Self::with_gap_secs(minutes.saturating_mul(60))
    }

    pub fn gap_threshold(&self) -> Duration {
        Duration::seconds(self.gap_threshold_secs.clamp(0, MAX_GAP_THRESHOLD_SECS))
    }

    pub fn validate(&self) -> Result<(), ComputeError> {
        if !(0..=MAX_GAP_THRESHOLD_SECS).contains(&self.gap_threshold_secs) {
            return Err(ComputeError::InvalidConfig(format!(
                "gap_threshold_secs must be between 0 and {}, got {}",
                MAX_GAP_THRESHOLD_SECS, self.gap_threshold_secs
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let config: AnalyzerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_five_minutes() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.gap_threshold(), Duration::minutes(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_gap_minutes() {
        assert_eq!(AnalyzerConfig::with_gap_minutes(2).gap_threshold_secs, 120);
    }

    #[test]
    fn test_negative_gap_rejected() {
        let result = AnalyzerConfig::from_json(r#"{"gap_threshold_secs": -5}"#);
        assert!(matches!(result, Err(ComputeError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_field_uses_default() {
        let config = AnalyzerConfig::from_json("{}").unwrap();
        assert_eq!(config, AnalyzerConfig::default());
    }
}
