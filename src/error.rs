//! Error types for Region Flux

use thiserror::Error;

/// Errors that can occur while ingesting, filtering or reporting readings.
///
/// The segmentation engine itself never fails; these cover the layers around it.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to parse reading payload: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid reading: {0}")]
    InvalidReading(String),
}
