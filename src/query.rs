//! Reading query filters
//!
//! Narrows a reading set by calendar date range, region substring and activity
//! before analysis, and returns the survivors in chronological order.

use crate::error::ComputeError;
use crate::types::{FiltersApplied, Reading};
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Filter applied to readings before segmentation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingQuery {
    /// First calendar date (UTC) to include
    pub start_date: Option<NaiveDate>,
    /// Last calendar date (UTC) to include
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring of the raw location label
    pub region: Option<String>,
    /// Exact activity tag
    pub activity: Option<String>,
}

impl ReadingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start date from a `YYYY-MM-DD` string
    pub fn start_date(mut self, date: &str) -> Result<Self, ComputeError> {
        self.start_date = Some(parse_date(date, "start_date")?);
        Ok(self)
    }

    /// Set the end date from a `YYYY-MM-DD` string
    pub fn end_date(mut self, date: &str) -> Result<Self, ComputeError> {
        self.end_date = Some(parse_date(date, "end_date")?);
        Ok(self)
    }

    pub fn region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub fn activity(mut self, activity: &str) -> Self {
        self.activity = Some(activity.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// The configured filters in their `YYYY-MM-DD` / text form
    pub fn filters_applied(&self) -> FiltersApplied {
        FiltersApplied {
            start_date: self.start_date.map(|d| d.format(DATE_FORMAT).to_string()),
            end_date: self.end_date.map(|d| d.format(DATE_FORMAT).to_string()),
            region: self.region.clone(),
            activity: self.activity.clone(),
        }
    }

    /// Whether a single reading passes every configured filter
    pub fn matches(&self, reading: &Reading) -> bool {
        let date = reading.timestamp.date_naive();

        if self.start_date.is_some_and(|start| date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }

        if let Some(needle) = &self.region {
            let needle = needle.to_lowercase();
            let matched = reading
                .raw_region
                .as_deref()
                .is_some_and(|label| label.to_lowercase().contains(&needle));
            if !matched {
                return false;
            }
        }

        if let Some(activity) = &self.activity {
            if reading.activity.as_deref() != Some(activity.as_str()) {
                return false;
            }
        }

        true
    }

    /// Filter readings and stable-sort the result by timestamp
    pub fn apply(&self, readings: &[Reading]) -> Vec<Reading> {
        let mut selected: Vec<Reading> = if self.is_empty() {
            readings.to_vec()
        } else {
            readings.iter().filter(|r| self.matches(r)).cloned().collect()
        };
        selected.sort_by_key(|r| r.timestamp);

        log::debug!(
            "query kept {} of {} readings",
            selected.len(),
            readings.len()
        );
        selected
    }
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, ComputeError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ComputeError::DateParseError(format!(
            "Invalid {field} format: {value}. Use YYYY-MM-DD"
        ))
    })
}
