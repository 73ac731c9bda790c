//! Insight charts over the cleaned Telco dataset.
//!
//! Five independent charts are computed from the same cleaning rules the
//! trainer applies and drawn with plotters to standalone SVG files, each with a short
//! ASCII summary for the terminal. One failing chart never prevents the
//! others from being written.

pub mod ascii;
pub mod charts;
pub mod error;
pub mod insights;
pub mod plot;
pub mod stats;

pub use charts::{CategoryCounts, CorrelationMatrix, DensityCurves, StackedHistogram};
pub use error::InsightError;
pub use insights::{
    generate_insights, render_all, ChartKind, ChartOutcome, InsightConfig, InsightReport,
    KDE_GRID_POINTS, TENURE_BINS,
};
