//! Segment confidence scoring
//!
//! Scores a group of readings believed to belong to one segment on a 0-100
//! scale from three signals: accuracy radius, reading count and timing
//! regularity. The breakpoints and coefficients below are calibrated
//! constants and must be reproduced exactly.

use crate::types::Reading;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Average accuracy (meters) at or above which readings are considered poor
const POOR_ACCURACY_M: f64 = 1000.0;

/// Average accuracy (meters) at or above which readings are considered fair
const FAIR_ACCURACY_M: f64 = 500.0;

const BASE_POOR: f64 = 30.0;
const BASE_FAIR: f64 = 40.0;
const BASE_GOOD: f64 = 50.0;
const BASE_NO_ACCURACY: f64 = 40.0;

/// Mean inter-reading gap (seconds) at which the timing bonus reaches zero
const MAX_TIMING_GAP_SEC: f64 = 600.0;

const MAX_TIMING_BONUS: f64 = 20.0;

/// Components of a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    /// Mean of the present accuracy values, `None` without accuracy data
    pub average_accuracy: Option<f64>,
    pub base: f64,
    pub consecutive_bonus: f64,
    pub accuracy_bonus: f64,
    pub timing_bonus: f64,
    /// Clamped to 0-100 and rounded to two decimals
    pub total: f64,
}

impl ConfidenceBreakdown {
    fn zero(average_accuracy: Option<f64>) -> Self {
        Self {
            average_accuracy,
            base: 0.0,
            consecutive_bonus: 0.0,
            accuracy_bonus: 0.0,
            timing_bonus: 0.0,
            total: 0.0,
        }
    }
}

/// Confidence scorer for reading groups
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    /// Score a reading group. Never fails; degenerate groups score 0.0.
    pub fn score(readings: &[Reading]) -> f64 {
        Self::breakdown(readings).total
    }

    /// Score a reading group and return the individual components
    pub fn breakdown(readings: &[Reading]) -> ConfidenceBreakdown {
        if readings.is_empty() {
            return ConfidenceBreakdown::zero(None);
        }

        let average_accuracy = mean_accuracy(readings);
        if let Some(avg) = average_accuracy.filter(|a| !a.is_finite()) {
            log::warn!("non-numeric mean accuracy ({avg}); confidence falls back to 0");
            return ConfidenceBreakdown::zero(average_accuracy);
        }

        let base = base_confidence(average_accuracy);
        let consecutive_bonus = consecutive_bonus(readings.len(), average_accuracy);
        let accuracy_bonus = accuracy_bonus(average_accuracy);
        let timing_bonus = timing_bonus(readings);

        let raw = base + consecutive_bonus + accuracy_bonus + timing_bonus;
        if !raw.is_finite() {
            log::warn!("non-numeric confidence total ({raw}); falling back to 0");
            return ConfidenceBreakdown::zero(average_accuracy);
        }

        ConfidenceBreakdown {
            average_accuracy,
            base,
            consecutive_bonus,
            accuracy_bonus,
            timing_bonus,
            total: round2(raw.clamp(0.0, 100.0)),
        }
    }
}

/// Mean of the present accuracy values
pub(crate) fn mean_accuracy(readings: &[Reading]) -> Option<f64> {
    let (sum, count) = readings
        .iter()
        .filter_map(|r| r.accuracy)
        .fold((0.0, 0usize), |(sum, count), a| (sum + a, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Round to two decimal places.
///
/// Formats through the exact binary value so `x.xx5` boundaries round the
/// same way a correctly rounded decimal conversion does.
pub(crate) fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Base confidence by accuracy tier
///
/// `A >= 1000 -> 30`, `500 <= A < 1000 -> 40`, `A < 500 -> 50`, no data `-> 40`
fn base_confidence(average_accuracy: Option<f64>) -> f64 {
    match average_accuracy {
        Some(a) if a >= POOR_ACCURACY_M => BASE_POOR,
        Some(a) if a >= FAIR_ACCURACY_M => BASE_FAIR,
        Some(_) => BASE_GOOD,
        None => BASE_NO_ACCURACY,
    }
}

/// Reward for reading count, dampened for poor accuracy
///
/// Poor accuracy: `min(count, 10)`, otherwise `min(2 * count, 20)`
fn consecutive_bonus(count: usize, average_accuracy: Option<f64>) -> f64 {
    let count = count as f64;
    match average_accuracy {
        Some(a) if a >= POOR_ACCURACY_M => count.min(10.0),
        _ => (count * 2.0).min(20.0),
    }
}

/// Accuracy contribution
///
/// Poor accuracy: `max(0, 10 * (1 - (A - 1000) / 1000))`
/// Otherwise: `max(0, 30 * (1 - min(A, 1000) / 1000))`
fn accuracy_bonus(average_accuracy: Option<f64>) -> f64 {
    match average_accuracy {
        Some(a) if a >= POOR_ACCURACY_M => {
            (10.0 * (1.0 - (a - POOR_ACCURACY_M) / POOR_ACCURACY_M)).max(0.0)
        }
        Some(a) => (30.0 * (1.0 - a.min(POOR_ACCURACY_M) / POOR_ACCURACY_M)).max(0.0),
        None => 0.0,
    }
}

/// Timing consistency: shorter mean gaps between readings score higher
///
/// Formula: `max(0, 20 * (1 - min(mean_gap, 600) / 600))`, zero for a single reading
fn timing_bonus(readings: &[Reading]) -> f64 {
    if readings.len() < 2 {
        return 0.0;
    }

    let gaps: Vec<f64> = readings
        .windows(2)
        .map(|pair| gap_seconds(pair[1].timestamp - pair[0].timestamp))
        .collect();
    let mean_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;

    (MAX_TIMING_BONUS * (1.0 - mean_gap.min(MAX_TIMING_GAP_SEC) / MAX_TIMING_GAP_SEC)).max(0.0)
}

/// Absolute length of a gap in seconds, keeping microseconds
fn gap_seconds(gap: Duration) -> f64 {
    match gap.num_microseconds() {
        Some(us) => us.unsigned_abs() as f64 / 1_000_000.0,
        None => gap.num_milliseconds().unsigned_abs() as f64 / 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 23, 10, 0, 0).unwrap()
    }

    fn group(accuracies: &[Option<f64>], spacing_sec: i64) -> Vec<Reading> {
        accuracies
            .iter()
            .enumerate()
            .map(|(i, acc)| {
                Reading::new(
                    t0() + Duration::seconds(spacing_sec * i as i64),
                    Some("NJ"),
                    *acc,
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_group_scores_zero() {
        assert_eq!(ConfidenceScorer::score(&[]), 0.0);
    }

    #[test]
    fn test_single_good_reading() {
        // 50 base + 2 consecutive + 30 * (1 - 10/1000) = 81.7
        let score = ConfidenceScorer::score(&group(&[Some(10.0)], 0));
        assert!((score - 81.7).abs() < 1e-9);
    }

    #[test]
    fn test_single_poor_reading() {
        // 30 base + 1 consecutive + 10 * (1 - 1000/1000) = 31
        let score = ConfidenceScorer::score(&group(&[Some(2000.0)], 0));
        assert!((score - 31.0).abs() < 1e-9);
        assert!((20.0..=55.0).contains(&score));
    }

    #[test]
    fn test_single_medium_reading() {
        // 50 + 2 + 30 * 0.9 = 79
        let score = ConfidenceScorer::score(&group(&[Some(100.0)], 0));
        assert!((score - 79.0).abs() < 1e-9);
    }

    #[test]
    fn test_fair_tier() {
        // 40 + 2 + 30 * 0.3 = 51
        let breakdown = ConfidenceScorer::breakdown(&group(&[Some(700.0)], 0));
        assert_eq!(breakdown.base, 40.0);
        assert!((breakdown.accuracy_bonus - 9.0).abs() < 1e-9);
        assert!((breakdown.total - 51.0).abs() < 1e-9);
    }

    #[test]
    fn test_tier_breakpoints_are_inclusive() {
        assert_eq!(base_confidence(Some(1000.0)), 30.0);
        assert_eq!(base_confidence(Some(999.99)), 40.0);
        assert_eq!(base_confidence(Some(500.0)), 40.0);
        assert_eq!(base_confidence(Some(499.99)), 50.0);
        assert_eq!(base_confidence(None), 40.0);
    }

    #[test]
    fn test_no_accuracy_data() {
        // 40 base + 6 consecutive + 0 accuracy + 20 * (1 - 60/600) = 64
        let breakdown = ConfidenceScorer::breakdown(&group(&[None, None, None], 60));
        assert_eq!(breakdown.average_accuracy, None);
        assert_eq!(breakdown.accuracy_bonus, 0.0);
        assert_eq!(breakdown.consecutive_bonus, 6.0);
        assert!((breakdown.total - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_absent_accuracies_are_ignored_in_mean() {
        let readings = group(&[Some(10.0), None, Some(30.0)], 1);
        assert_eq!(mean_accuracy(&readings), Some(20.0));
    }

    #[test]
    fn test_consecutive_bonus_caps() {
        assert_eq!(consecutive_bonus(15, Some(1500.0)), 10.0);
        assert_eq!(consecutive_bonus(4, Some(1500.0)), 4.0);
        assert_eq!(consecutive_bonus(15, Some(10.0)), 20.0);
        assert_eq!(consecutive_bonus(3, None), 6.0);
    }

    #[test]
    fn test_poor_accuracy_bonus_floors_at_zero() {
        assert_eq!(accuracy_bonus(Some(2500.0)), 0.0);
        assert!((accuracy_bonus(Some(1500.0)) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_timing_bonus() {
        assert_eq!(timing_bonus(&group(&[Some(5.0)], 0)), 0.0);
        assert_eq!(timing_bonus(&group(&[Some(5.0), Some(5.0)], 900)), 0.0);
        assert!((timing_bonus(&group(&[Some(5.0), Some(5.0)], 300)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_timing_uses_absolute_gaps() {
        let mut readings = group(&[Some(5.0), Some(5.0)], 0);
        readings[1].timestamp = t0() - Duration::seconds(300);
        assert!((timing_bonus(&readings) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_tight_accurate_group_clamps_to_100() {
        let score = ConfidenceScorer::score(&group(&[Some(5.0); 5], 1));
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_non_numeric_accuracy_falls_back_to_zero() {
        let readings = group(&[Some(f64::NAN), Some(10.0)], 1);
        assert_eq!(ConfidenceScorer::score(&readings), 0.0);

        let readings = group(&[Some(f64::INFINITY)], 0);
        assert_eq!(ConfidenceScorer::score(&readings), 0.0);
    }

    #[test]
    fn test_score_is_rounded_to_hundredths() {
        // 50 + 2 + 30 * (1 - 123.456/1000) = 78.29632
        let score = ConfidenceScorer::score(&group(&[Some(123.456)], 0));
        assert_eq!(score, 78.3);
    }

    #[test]
    fn test_rounding_follows_exact_binary_value() {
        // 52 + 30 * (1 - A/1000) lands on x.xx5 in decimal but not in binary
        let cases = [(0.5, 81.98), (1.5, 81.95), (2.5, 81.92)];
        for (acc, expected) in cases {
            let score = ConfidenceScorer::score(&group(&[Some(acc)], 0));
            assert_eq!(score, expected, "accuracy {acc}");
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(78.29632), 78.3);
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(-1.234), -1.23);
        assert!(round2(f64::NAN).is_nan());
    }

    #[test]
    fn test_gap_seconds_keeps_microseconds() {
        assert_eq!(gap_seconds(Duration::microseconds(1_500)), 0.0015);
        assert_eq!(gap_seconds(Duration::microseconds(-250)), 0.00025);
        assert_eq!(gap_seconds(Duration::seconds(300)), 300.0);
    }

    #[test]
    fn test_scores_stay_in_range() {
        for acc in [0.0, 1.0, 50.0, 499.0, 500.0, 999.0, 1000.0, 1999.0, 5000.0, 1e9] {
            for n in 1..12 {
                for spacing in [0, 1, 59, 300, 3600] {
                    let readings = group(&vec![Some(acc); n], spacing);
                    let score = ConfidenceScorer::score(&readings);
                    assert!((0.0..=100.0).contains(&score), "score {score} out of range");
                }
            }
        }
    }
}
