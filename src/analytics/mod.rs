//! # Aggregation Engine
//!
//! Computes the analyze endpoint's visualizations over a filtered molecule
//! set: categorical counts (bar), adaptive histograms (density) and
//! three-level classification trees (sunburst).
//!
//! The engine holds no state between requests.

mod bar;
mod engine;
mod errors;
mod histogram;
mod request;
mod sunburst;

pub use bar::bar_series;
pub use engine::AggregationEngine;
pub use errors::{AnalyticsError, AnalyticsResult};
pub use histogram::{density_series, BinMode, Histogram, FLOAT_BIN_COUNT, MAX_INTEGRAL_BINS};
pub use request::{
    AggregationRequest, AggregationResult, AggregationValues, ChartType, LabeledCount,
    SunburstNode, SunburstScheme,
};
pub use sunburst::sunburst_tree;
