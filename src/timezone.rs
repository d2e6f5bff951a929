//! Display timezone handling
//!
//! Report timestamps are rendered in a zone chosen by the caller: an IANA name
//! (`America/New_York`), `UTC`/`Z`, or a fixed offset (`+05:30`, `UTC-04:00`).

use crate::error::ComputeError;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use chrono_tz::Tz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Fixed(FixedOffset),
    Named(Tz),
}

/// Zone used to render report timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayZone {
    name: String,
    zone: Zone,
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self::utc()
    }
}

impl DisplayZone {
    pub fn utc() -> Self {
        Self {
            name: "UTC".to_string(),
            zone: Zone::Named(Tz::UTC),
        }
    }

    /// Parse a zone specifier
    pub fn parse(value: &str) -> Result<Self, ComputeError> {
        let trimmed = value.trim();
        let upper = trimmed.to_uppercase();

        if upper == "UTC" || upper == "Z" || upper == "GMT" {
            return Ok(Self::utc());
        }

        if let Ok(tz) = trimmed.parse::<Tz>() {
            return Ok(Self {
                name: tz.name().to_string(),
                zone: Zone::Named(tz),
            });
        }

        let offset_part = upper
            .strip_prefix("UTC")
            .or_else(|| upper.strip_prefix("GMT"))
            .unwrap_or(&upper);

        let offset = offset_part
            .parse::<FixedOffset>()
            .map_err(|_| ComputeError::InvalidTimezone(value.to_string()))?;

        Ok(Self {
            name: trimmed.to_string(),
            zone: Zone::Fixed(offset),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render an instant as RFC 3339 in this zone
    pub fn format(&self, instant: &DateTime<Utc>) -> String {
        match self.zone {
            Zone::Fixed(offset) => instant
                .with_timezone(&offset)
                .to_rfc3339_opts(SecondsFormat::AutoSi, false),
            Zone::Named(tz) => instant
                .with_timezone(&tz)
                .to_rfc3339_opts(SecondsFormat::AutoSi, false),
        }
    }
}
