//! Core types for the Region Flux pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: readings going in, segments coming out of the engine, and the
//! analysis report handed to the surrounding service layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Geographic position of a reading (WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A single timestamped location ping.
///
/// Only `timestamp`, `raw_region` and `accuracy` take part in segmentation and
/// scoring. The remaining fields ride along for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Absolute instant of the ping
    pub timestamp: DateTime<Utc>,
    /// Free-form location label (e.g. "Jersey City, NJ/USA")
    pub raw_region: Option<String>,
    /// Accuracy radius in meters
    pub accuracy: Option<f64>,
    pub coordinates: Option<Coordinates>,
    /// Activity tag supplied by the producer (e.g. "Personal")
    pub activity: Option<String>,
    /// Derived signal strength (0-100)
    pub signal_strength: Option<f64>,
    /// Raw accuracy level reported alongside the accuracy radius
    pub accuracy_level: Option<f64>,
}

impl Reading {
    /// Create a reading carrying only the fields the engine uses
    pub fn new(timestamp: DateTime<Utc>, raw_region: Option<&str>, accuracy: Option<f64>) -> Self {
        Self {
            timestamp,
            raw_region: raw_region.map(str::to_string),
            accuracy,
            coordinates: None,
            activity: None,
            signal_strength: None,
            accuracy_level: None,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some(Coordinates {
            latitude,
            longitude,
        });
        self
    }

    pub fn with_activity(mut self, activity: &str) -> Self {
        self.activity = Some(activity.to_string());
        self
    }
}

/// Why a segment ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionType {
    /// The next reading resolved to a different region
    RegionChange,
    /// The next reading in the same region arrived after the gap threshold
    TimeGap,
    /// The input stream ended
    FinalPeriod,
}

impl TransitionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionType::RegionChange => "region_change",
            TransitionType::TimeGap => "time_gap",
            TransitionType::FinalPeriod => "final_period",
        }
    }
}

/// A maximal run of consecutive readings assigned to one canonical region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Canonical region code
    pub region: String,
    /// Timestamp of the first member reading
    pub start_time: DateTime<Utc>,
    /// Timestamp of the last member reading
    pub end_time: DateTime<Utc>,
    pub reading_count: usize,
    /// Mean of the present accuracy values, 0.0 when none were present
    pub average_accuracy: f64,
    /// Trust score (0-100)
    pub confidence: f64,
    pub transition_type: TransitionType,
}

impl Segment {
    /// Dwell time covered by the segment in hours
    pub fn duration_hours(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 3_600_000.0
    }
}

/// Engine output together with the input facts a report needs
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub segments: Vec<Segment>,
    /// Every reading handed to the segmenter
    pub total_readings: usize,
    /// Earliest and latest input timestamps
    pub time_span: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub gap_threshold_secs: i64,
}

impl Analysis {
    /// Readings that ended up in a segment
    pub fn analyzed_readings(&self) -> usize {
        self.segments.iter().map(|s| s.reading_count).sum()
    }

    /// Readings dropped for lack of a region
    pub fn dropped_readings(&self) -> usize {
        self.total_readings.saturating_sub(self.analyzed_readings())
    }
}

// ============================================================================
// Report Types
// ============================================================================

/// Per-region summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStatistics {
    pub reading_count: usize,
    pub hours_spent: f64,
    pub percentage_of_readings: f64,
}

/// Earliest and latest reading timestamps (rendered in the display zone)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Producer metadata embedded in every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// One segment as it appears in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub start_time: String,
    pub end_time: String,
    pub region: String,
    pub confidence: f64,
    pub readings_count: usize,
    pub average_accuracy: f64,
    pub transition_type: TransitionType,
}

/// Report-level metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Every reading handed to the analysis, including dropped ones
    pub total_readings: usize,
    /// Readings that resolved to a region and joined a segment
    pub analyzed_readings: usize,
    /// Readings without an extractable region
    pub dropped_readings: usize,
    pub unique_regions: Vec<String>,
    pub region_statistics: BTreeMap<String, RegionStatistics>,
    pub timezone: String,
    pub gap_threshold_secs: i64,
    pub date_range: Option<DateRange>,
    pub computed_at_utc: String,
}

/// Full analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub producer: ReportProducer,
    pub analysis: Vec<SegmentRecord>,
    pub metadata: ReportMetadata,
}

// ============================================================================
// Location Listing Types
// ============================================================================

/// Filters that produced a listing, as the caller supplied them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiltersApplied {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub region: Option<String>,
    pub activity: Option<String>,
}

/// One reading as it appears in a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Ping time rendered in the display zone
    pub timestamp: String,
    pub location: Option<String>,
    pub activity: Option<String>,
    pub accuracy: Option<f64>,
    pub coordinates: Option<Coordinates>,
    pub accuracy_level: Option<f64>,
    pub signal_strength: Option<f64>,
}

/// Listing-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMetadata {
    pub total_records: usize,
    pub timezone: String,
    pub filters_applied: FiltersApplied,
}

/// Filtered, chronologically ordered readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationListing {
    pub metadata: LocationMetadata,
    pub data: Vec<LocationRecord>,
}
