//! Pipeline orchestration
//!
//! This module provides the public API for Region Flux.
//! It runs the full pipeline from raw reading JSON to an analysis report.

use crate::config::AnalyzerConfig;
use crate::encoder::ReportEncoder;
use crate::error::ComputeError;
use crate::query::ReadingQuery;
use crate::region::AliasTable;
use crate::schema::{RawReading, ReadingAdapter};
use crate::segmenter::Segmenter;
use crate::summary::date_range;
use crate::timezone::DisplayZone;
use crate::types::{Analysis, AnalysisReport, LocationListing, Reading, Segment};

/// Convert a JSON array of raw readings into a pretty-printed analysis report.
///
/// # Arguments
/// * `readings_json` - JSON array of `geo.reading.v1` records
/// * `aliases_json` - Optional alias table (`{"NY": ["NEW YORK", "USA"]}`)
///
/// # Example
/// ```ignore
/// let report = analyze_readings(readings_json, Some(aliases_json))?;
/// ```
pub fn analyze_readings(
    readings_json: String,
    aliases_json: Option<String>,
) -> Result<String, ComputeError> {
    let aliases = match aliases_json {
        Some(json) => AliasTable::from_json(&json)?,
        None => AliasTable::new(),
    };

    RegionAnalyzer::new()
        .with_aliases(aliases)
        .process(&readings_json)
}

/// Stateful analyzer holding the alias table, settings and encoder.
///
/// Use this when the same alias table serves many requests, or when the
/// table is edited between calls.
#[derive(Debug, Clone)]
pub struct RegionAnalyzer {
    aliases: AliasTable,
    config: AnalyzerConfig,
    query: ReadingQuery,
    encoder: ReportEncoder,
}

impl Default for RegionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionAnalyzer {
    /// Create an analyzer with an empty alias table and default settings
    pub fn new() -> Self {
        Self {
            aliases: AliasTable::new(),
            config: AnalyzerConfig::default(),
            query: ReadingQuery::default(),
            encoder: ReportEncoder::new(),
        }
    }

    /// Create an analyzer with validated settings
    pub fn with_config(config: AnalyzerConfig) -> Result<Self, ComputeError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_query(mut self, query: ReadingQuery) -> Self {
        self.query = query;
        self
    }

    /// Set the zone report timestamps are rendered in
    pub fn set_timezone(&mut self, zone_name: &str) -> Result<(), ComputeError> {
        let zone = DisplayZone::parse(zone_name)?;
        self.encoder.set_zone(zone);
        Ok(())
    }

    /// Filtered, chronologically ordered input
    fn prepare(&self, readings: &[Reading]) -> Vec<Reading> {
        self.query.apply(readings)
    }

    /// Segment readings without building a report
    pub fn segments(&self, readings: &[Reading]) -> Vec<Segment> {
        let prepared = self.prepare(readings);
        Segmenter::with_config(&self.aliases, &self.config).segment(&prepared)
    }

    /// Segment readings and collect the facts a report needs
    pub fn analysis(&self, readings: &[Reading]) -> Analysis {
        let prepared = self.prepare(readings);
        let segmenter = Segmenter::with_config(&self.aliases, &self.config);

        let analysis = Analysis {
            segments: segmenter.segment(&prepared),
            total_readings: prepared.len(),
            time_span: date_range(&prepared),
            gap_threshold_secs: segmenter.gap_threshold().num_seconds(),
        };

        log::info!(
            "analyzed {} readings: {} dropped, {} segments",
            analysis.total_readings,
            analysis.dropped_readings(),
            analysis.segments.len()
        );
        analysis
    }

    /// Run the full pipeline over in-memory readings
    pub fn analyze(&self, readings: &[Reading]) -> Result<AnalysisReport, ComputeError> {
        self.config.validate()?;
        Ok(self.encoder.encode(&self.analysis(readings)))
    }

    /// List the filtered readings in chronological order
    pub fn locations(&self, readings: &[Reading]) -> LocationListing {
        let prepared = self.prepare(readings);
        self.encoder.encode_locations(&prepared, self.query.filters_applied())
    }

    /// Parse a JSON array of raw readings and list them as pretty JSON
    pub fn locations_json(&self, readings_json: &str) -> Result<String, ComputeError> {
        let raw = ReadingAdapter::parse_array(readings_json)?;
        let readings = ReadingAdapter::to_readings(&raw)?;
        serde_json::to_string_pretty(&self.locations(&readings)).map_err(ComputeError::JsonError)
    }

    /// Process a JSON array of raw readings into a report JSON string
    pub fn process(&self, readings_json: &str) -> Result<String, ComputeError> {
        let raw = ReadingAdapter::parse_array(readings_json)?;
        self.process_raw(&raw)
    }

    /// Process NDJSON raw readings into a report JSON string
    pub fn process_ndjson(&self, readings_ndjson: &str) -> Result<String, ComputeError> {
        let raw = ReadingAdapter::parse_ndjson(readings_ndjson)?;
        self.process_raw(&raw)
    }

    fn process_raw(&self, raw: &[RawReading]) -> Result<String, ComputeError> {
        let readings = ReadingAdapter::to_readings(raw)?;
        self.config.validate()?;
        self.encoder.encode_to_json(&self.analysis(&readings))
    }

    /// Save the alias table to JSON
    pub fn save_aliases(&self) -> Result<String, ComputeError> {
        Ok(self.aliases.to_json()?)
    }

    /// Replace the alias table from JSON
    pub fn load_aliases(&mut self, json: &str) -> Result<(), ComputeError> {
        self.aliases = AliasTable::from_json(json)?;
        Ok(())
    }

    pub fn add_alias(&mut self, canonical: &str, alias: &str) {
        self.aliases.insert(canonical, alias);
    }

    /// Number of aliases across all canonical codes
    pub fn alias_count(&self) -> usize {
        self.aliases.alias_count()
    }

    pub fn clear_aliases(&mut self) {
        self.aliases.clear();
    }
}
