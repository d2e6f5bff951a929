//! Region Flux - Region-transition segmentation for location ping streams
//!
//! Flux turns a time-ordered stream of location readings into segments of
//! stable dwell in one region, each scored for confidence, through a
//! deterministic pipeline: ingestion → filtering → region extraction →
//! segmentation → confidence scoring → report encoding.
//!
//! ## Modules
//!
//! - **Engine**: `region`, `confidence` and `segmenter` hold the pure core
//! - **Pipeline**: `schema`, `query`, `summary` and `encoder` wrap the engine for services

pub mod config;
pub mod confidence;
pub mod encoder;
pub mod error;
pub mod pipeline;
pub mod query;
pub mod region;
pub mod schema;
pub mod segmenter;
pub mod signal;
pub mod summary;
pub mod timezone;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::AnalyzerConfig;
pub use confidence::{ConfidenceBreakdown, ConfidenceScorer};
pub use encoder::ReportEncoder;
pub use error::ComputeError;
pub use pipeline::{analyze_readings, RegionAnalyzer};
pub use query::ReadingQuery;
pub use region::{AliasTable, RegionExtractor};
pub use segmenter::Segmenter;
pub use timezone::DisplayZone;
pub use types::{
    Analysis, AnalysisReport, FiltersApplied, LocationListing, LocationRecord, Reading, Segment,
    TransitionType,
};

// Schema exports
pub use schema::{RawReading, ReadingAdapter, SCHEMA_VERSION};

/// Flux version embedded in all reports
pub const FLUX_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "region-flux";
