//! Region-transition segmentation
//!
//! Groups a time-ordered reading stream into segments of stable dwell in one
//! region. A segment closes when the next reading resolves to another region
//! or arrives more than the gap threshold after the segment's last reading.

use crate::confidence::{mean_accuracy, ConfidenceScorer};
use crate::config::AnalyzerConfig;
use crate::region::{AliasTable, RegionExtractor};
use crate::types::{Reading, Segment, TransitionType};
use chrono::Duration;

/// Readings accumulated for the segment currently being built
struct OpenGroup {
    region: String,
    readings: Vec<Reading>,
}

impl OpenGroup {
    fn start(region: String, reading: &Reading) -> Self {
        Self {
            region,
            readings: vec![reading.clone()],
        }
    }

    /// Transition that closes this group if `reading` (resolved to `region`)
    /// cannot join it. Region changes take precedence over gaps.
    fn boundary_for(
        &self,
        region: &str,
        reading: &Reading,
        gap: Duration,
    ) -> Option<TransitionType> {
        if region != self.region {
            return Some(TransitionType::RegionChange);
        }
        let last = self.readings.last()?;
        if reading.timestamp - last.timestamp > gap {
            return Some(TransitionType::TimeGap);
        }
        None
    }
}

enum State {
    Idle,
    Accumulating(OpenGroup),
}

/// Stateless-per-call segmenter over a borrowed alias table
pub struct Segmenter<'a> {
    extractor: RegionExtractor<'a>,
    gap_threshold: Duration,
}

impl<'a> Segmenter<'a> {
    /// Create a segmenter with the default 5 minute gap threshold
    pub fn new(aliases: &'a AliasTable) -> Self {
        Self::with_config(aliases, &AnalyzerConfig::default())
    }

    pub fn with_config(aliases: &'a AliasTable, config: &AnalyzerConfig) -> Self {
        Self {
            extractor: RegionExtractor::new(aliases),
            gap_threshold: config.gap_threshold(),
        }
    }

    pub fn with_gap_threshold(aliases: &'a AliasTable, gap_threshold: Duration) -> Self {
        Self {
            extractor: RegionExtractor::new(aliases),
            gap_threshold,
        }
    }

    pub fn gap_threshold(&self) -> Duration {
        self.gap_threshold
    }

    /// Partition readings (assumed ascending by timestamp) into segments.
    ///
    /// Readings without an extractable region are skipped: they neither join
    /// nor close the open segment.
    pub fn segment(&self, readings: &[Reading]) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut state = State::Idle;

        for reading in readings {
            let Some(region) = self.extractor.extract(reading.raw_region.as_deref()) else {
                continue;
            };

            state = match state {
                State::Idle => State::Accumulating(OpenGroup::start(region, reading)),
                State::Accumulating(mut group) => {
                    match group.boundary_for(&region, reading, self.gap_threshold) {
                        Some(transition) => {
                            segments.push(finalize(group, transition));
                            State::Accumulating(OpenGroup::start(region, reading))
                        }
                        None => {
                            group.readings.push(reading.clone());
                            State::Accumulating(group)
                        }
                    }
                }
            };
        }

        if let State::Accumulating(group) = state {
            segments.push(finalize(group, TransitionType::FinalPeriod));
        }

        log::info!(
            "segmented {} readings into {} segments",
            readings.len(),
            segments.len()
        );
        segments
    }
}

/// Close a group into a scored segment
fn finalize(group: OpenGroup, transition_type: TransitionType) -> Segment {
    let confidence = ConfidenceScorer::score(&group.readings);
    let average_accuracy = mean_accuracy(&group.readings)
        .filter(|a| a.is_finite())
        .unwrap_or(0.0);

    // Groups are never empty: they open with their first reading.
    let start_time = group.readings[0].timestamp;
    let end_time = group.readings[group.readings.len() - 1].timestamp;

    log::debug!(
        "closed {} segment: {} readings, {}, confidence {:.2}",
        group.region,
        group.readings.len(),
        transition_type.as_str(),
        confidence
    );

    Segment {
        region: group.region,
        start_time,
        end_time,
        reading_count: group.readings.len(),
        average_accuracy,
        confidence,
        transition_type,
    }
}
