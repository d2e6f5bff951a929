//! Adapter for converting geo.reading.v1 records into engine readings

use crate::error::ComputeError;
use crate::schema::raw_reading::{RawReading, ValidationError};
use crate::types::Reading;

/// Adapter for parsing and converting raw readings
pub struct ReadingAdapter;

impl ReadingAdapter {
    /// Parse a JSON string containing an array of RawReadings
    pub fn parse_array(json: &str) -> Result<Vec<RawReading>, ComputeError> {
        let readings: Vec<RawReading> = serde_json::from_str(json)?;
        Ok(readings)
    }

    /// Parse NDJSON (newline-delimited JSON) containing RawReadings
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<RawReading>, ComputeError> {
        let mut readings = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<RawReading>(trimmed) {
                Ok(reading) => readings.push(reading),
                Err(e) => {
                    return Err(ComputeError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(readings)
    }

    /// Validate and convert raw records, failing on the first invalid one
    pub fn to_readings(raw: &[RawReading]) -> Result<Vec<Reading>, ComputeError> {
        raw.iter()
            .enumerate()
            .map(|(idx, record)| {
                record.to_reading().map_err(|e| {
                    ComputeError::InvalidReading(format!(
                        "record {} ({}): {}",
                        idx,
                        record.reading_id.as_deref().unwrap_or("no id"),
                        e
                    ))
                })
            })
            .collect()
    }

    /// Validate a batch of records, returning only the failures
    pub fn validate_readings(raw: &[RawReading]) -> Vec<ValidationResult> {
        raw.iter()
            .enumerate()
            .filter_map(|(idx, record)| {
                record.validate().err().map(|error| ValidationResult {
                    index: idx,
                    reading_id: record.reading_id.clone(),
                    error,
                })
            })
            .collect()
    }
}

/// A record that failed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub index: usize,
    pub reading_id: Option<String>,
    pub error: ValidationError,
}
