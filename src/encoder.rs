//! Report encoding
//!
//! Turns an engine analysis into the structured report handed to service
//! layers: segment records with display-zone timestamps, plus per-region
//! summary statistics. Non-numeric values never leave this module.

use crate::confidence::round2;
use crate::error::ComputeError;
use crate::summary::{region_statistics, unique_regions};
use crate::timezone::DisplayZone;
use crate::types::{
    Analysis, AnalysisReport, DateRange, FiltersApplied, LocationListing, LocationMetadata,
    LocationRecord, Reading, ReportMetadata, ReportProducer, Segment, SegmentRecord,
};
use crate::{FLUX_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Report encoder for producing analysis payloads
#[derive(Debug, Clone)]
pub struct ReportEncoder {
    instance_id: String,
    zone: DisplayZone,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID, rendering in UTC
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
            zone: DisplayZone::utc(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self {
            instance_id,
            zone: DisplayZone::utc(),
        }
    }

    pub fn with_zone(mut self, zone: DisplayZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn set_zone(&mut self, zone: DisplayZone) {
        self.zone = zone;
    }

    pub fn zone(&self) -> &DisplayZone {
        &self.zone
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Encode an analysis into a report
    pub fn encode(&self, analysis: &Analysis) -> AnalysisReport {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: FLUX_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let records = analysis
            .segments
            .iter()
            .map(|segment| self.build_record(segment))
            .collect();

        let date_range = analysis.time_span.map(|(start, end)| DateRange {
            start: self.zone.format(&start),
            end: self.zone.format(&end),
        });

        let metadata = ReportMetadata {
            total_readings: analysis.total_readings,
            analyzed_readings: analysis.analyzed_readings(),
            dropped_readings: analysis.dropped_readings(),
            unique_regions: unique_regions(&analysis.segments),
            region_statistics: region_statistics(&analysis.segments, analysis.total_readings),
            timezone: self.zone.name().to_string(),
            gap_threshold_secs: analysis.gap_threshold_secs,
            date_range,
            computed_at_utc: Utc::now().to_rfc3339(),
        };

        AnalysisReport {
            producer,
            analysis: records,
            metadata,
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(&self, analysis: &Analysis) -> Result<String, ComputeError> {
        let report = self.encode(analysis);
        serde_json::to_string_pretty(&report).map_err(ComputeError::JsonError)
    }

    /// List readings as they arrived, with timestamps in the display zone
    pub fn encode_locations(
        &self,
        readings: &[Reading],
        filters_applied: FiltersApplied,
    ) -> LocationListing {
        let data: Vec<LocationRecord> = readings
            .iter()
            .map(|reading| LocationRecord {
                timestamp: self.zone.format(&reading.timestamp),
                location: reading.raw_region.clone(),
                activity: reading.activity.clone(),
                accuracy: reading.accuracy.filter(|a| a.is_finite()),
                coordinates: reading.coordinates,
                accuracy_level: reading.accuracy_level.filter(|a| a.is_finite()),
                signal_strength: reading.signal_strength.filter(|s| s.is_finite()),
            })
            .collect();

        LocationListing {
            metadata: LocationMetadata {
                total_records: data.len(),
                timezone: self.zone.name().to_string(),
                filters_applied,
            },
            data,
        }
    }

    fn build_record(&self, segment: &Segment) -> SegmentRecord {
        SegmentRecord {
            start_time: self.zone.format(&segment.start_time),
            end_time: self.zone.format(&segment.end_time),
            region: segment.region.clone(),
            confidence: finite_or_zero(segment.confidence),
            readings_count: segment.reading_count,
            average_accuracy: finite_or_zero(segment.average_accuracy),
            transition_type: segment.transition_type,
        }
    }
}

/// Round to two decimals, mapping NaN and infinities to 0.0
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        round2(value)
    } else {
        0.0
    }
}
