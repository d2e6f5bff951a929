//! geo.reading.v1 input schema
//!
//! This module defines the producer-facing record for location pings and the
//! adapter that validates and converts those records into engine readings.

mod adapter;
mod raw_reading;

pub use adapter::*;
pub use raw_reading::*;
