//! geo.reading.v1 record definition
//!
//! One record per location ping as exported by carrier or handset tooling.
//! Timestamps may be RFC 3339 or naive (`2024-11-23 10:15:00`), in which case
//! they are taken as UTC.

use crate::signal::signal_strength_from_accuracy;
use crate::types::{Coordinates, Reading};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current schema version
pub const SCHEMA_VERSION: &str = "geo.reading.v1";

/// Naive timestamp layouts accepted besides RFC 3339
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Raw location ping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// Schema version, checked when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Producer-side identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_id: Option<String>,
    /// Ping time
    #[serde(alias = "date")]
    pub timestamp: String,
    /// Free-form location label
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
    /// Accuracy radius in meters
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Raw accuracy level; source for a derived signal strength
    #[serde(default, alias = "accuracy.1")]
    pub accuracy_level: Option<f64>,
    #[serde(default)]
    pub signal_strength: Option<f64>,
}

impl RawReading {
    /// Minimal record with a timestamp, label and accuracy
    pub fn new(timestamp: &str, location: Option<&str>, accuracy: Option<f64>) -> Self {
        Self {
            schema_version: None,
            reading_id: None,
            timestamp: timestamp.to_string(),
            location: location.map(str::to_string),
            activity: None,
            accuracy,
            latitude: None,
            longitude: None,
            accuracy_level: None,
            signal_strength: None,
        }
    }

    /// Validate the record
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(version) = &self.schema_version {
            if version != SCHEMA_VERSION {
                return Err(ValidationError::InvalidSchemaVersion {
                    expected: SCHEMA_VERSION.to_string(),
                    actual: version.clone(),
                });
            }
        }

        parse_timestamp(&self.timestamp)?;

        if let Some(accuracy) = self.accuracy {
            if !accuracy.is_finite() || accuracy < 0.0 {
                return Err(ValidationError::InvalidAccuracy(accuracy));
            }
        }

        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(ValidationError::LatitudeOutOfRange(lat));
                }
                if !(-180.0..=180.0).contains(&lon) {
                    return Err(ValidationError::LongitudeOutOfRange(lon));
                }
            }
            (None, None) => {}
            _ => return Err(ValidationError::IncompleteCoordinates),
        }

        Ok(())
    }

    /// Validate and convert into an engine reading
    pub fn to_reading(&self) -> Result<Reading, ValidationError> {
        self.validate()?;
        let timestamp = parse_timestamp(&self.timestamp)?;

        let coordinates = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };

        let signal_strength = self.signal_strength.or_else(|| {
            self.accuracy_level
                .filter(|level| level.is_finite())
                .map(signal_strength_from_accuracy)
        });

        Ok(Reading {
            timestamp,
            raw_region: self.location.clone(),
            accuracy: self.accuracy,
            coordinates,
            activity: self.activity.clone(),
            signal_strength,
            accuracy_level: self.accuracy_level,
        })
    }
}

/// Parse an RFC 3339 or naive UTC timestamp
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ValidationError::InvalidTimestamp(value.to_string()))
}

/// Schema validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid schema version: expected {expected}, got {actual}")]
    InvalidSchemaVersion { expected: String, actual: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Accuracy must be a non-negative number, got {0}")]
    InvalidAccuracy(f64),

    #[error("Latitude out of range: {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude out of range: {0}")]
    LongitudeOutOfRange(f64),

    #[error("Latitude and longitude must be supplied together")]
    IncompleteCoordinates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_export_row() {
        let json = r#"{
            "date": "2024-11-23 10:15:00",
            "location": "Jersey City, NJ",
            "activity": "Tower Jump",
            "accuracy": 2000.0,
            "latitude": 40.8296,
            "longitude": -73.9719,
            "accuracy.1": 2000
        }"#;

        let raw: RawReading = serde_json::from_str(json).unwrap();
        let reading = raw.to_reading().unwrap();

        assert_eq!(
            reading.timestamp,
            Utc.with_ymd_and_hms(2024, 11, 23, 10, 15, 0).unwrap()
        );
        assert_eq!(reading.raw_region.as_deref(), Some("Jersey City, NJ"));
        assert_eq!(reading.accuracy, Some(2000.0));
        assert_eq!(reading.signal_strength, Some(20.0));
        assert_eq!(reading.coordinates.unwrap().latitude, 40.8296);
    }

    #[test]
    fn test_explicit_signal_strength_wins() {
        let mut raw = RawReading::new("2024-11-23T10:00:00Z", Some("NJ"), Some(5.0));
        raw.accuracy_level = Some(5.0);
        raw.signal_strength = Some(42.0);

        assert_eq!(raw.to_reading().unwrap().signal_strength, Some(42.0));
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 11, 23, 10, 0, 0).unwrap();
        for value in [
            "2024-11-23T10:00:00Z",
            "2024-11-23T05:00:00-05:00",
            "2024-11-23T10:00:00",
            "2024-11-23 10:00:00.000",
            "2024-11-23 10:00",
        ] {
            assert_eq!(parse_timestamp(value).unwrap(), expected, "{value}");
        }

        assert!(matches!(
            parse_timestamp("23/11/2024"),
            Err(ValidationError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_validation_failures() {
        let mut raw = RawReading::new("2024-11-23T10:00:00Z", Some("NJ"), Some(-1.0));
        assert_eq!(raw.validate(), Err(ValidationError::InvalidAccuracy(-1.0)));

        raw.accuracy = Some(10.0);
        raw.latitude = Some(91.0);
        raw.longitude = Some(0.0);
        assert_eq!(raw.validate(), Err(ValidationError::LatitudeOutOfRange(91.0)));

        raw.latitude = Some(40.0);
        raw.longitude = None;
        assert_eq!(raw.validate(), Err(ValidationError::IncompleteCoordinates));

        raw.longitude = Some(-74.0);
        raw.schema_version = Some("geo.reading.v0".to_string());
        assert!(matches!(
            raw.validate(),
            Err(ValidationError::InvalidSchemaVersion { .. })
        ));

        raw.schema_version = Some(SCHEMA_VERSION.to_string());
        assert!(raw.validate().is_ok());
    }

    #[test]
    fn test_missing_location_is_valid() {
        let raw = RawReading::new("2024-11-23T10:00:00Z", None, None);
        let reading = raw.to_reading().unwrap();

        assert_eq!(reading.raw_region, None);
        assert_eq!(reading.signal_strength, None);
    }
}
