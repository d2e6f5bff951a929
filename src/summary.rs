//! Summary statistics over a segment list
//!
//! Plain reducers the report encoder uses to build per-region totals.

use crate::confidence::round2;
use crate::types::{Reading, RegionStatistics, Segment};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Sorted, de-duplicated region codes
pub fn unique_regions(segments: &[Segment]) -> Vec<String> {
    let mut regions: Vec<String> = segments.iter().map(|s| s.region.clone()).collect();
    regions.sort();
    regions.dedup();
    regions
}

/// Per-region reading counts, dwell hours and share of all readings.
///
/// `total_readings` is the size of the analysed input, including readings
/// that were dropped for lack of a region.
pub fn region_statistics(
    segments: &[Segment],
    total_readings: usize,
) -> BTreeMap<String, RegionStatistics> {
    let mut counts: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for segment in segments {
        let entry = counts.entry(segment.region.as_str()).or_insert((0, 0.0));
        entry.0 += segment.reading_count;
        entry.1 += segment.duration_hours();
    }

    counts
        .into_iter()
        .map(|(region, (reading_count, hours))| {
            let percentage_of_readings = if total_readings == 0 {
                0.0
            } else {
                round2(reading_count as f64 / total_readings as f64 * 100.0)
            };
            (
                region.to_string(),
                RegionStatistics {
                    reading_count,
                    hours_spent: round2(hours),
                    percentage_of_readings,
                },
            )
        })
        .collect()
}

/// Earliest and latest reading timestamps
pub fn date_range(readings: &[Reading]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = readings.iter().map(|r| r.timestamp).min()?;
    let end = readings.iter().map(|r| r.timestamp).max()?;
    Some((start, end))
}
