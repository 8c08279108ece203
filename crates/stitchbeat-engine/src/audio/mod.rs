//! Audio analysis input layer.

pub mod analyzer;
pub mod source;

pub use analyzer::SpectrumAnalyzer;
pub use source::{AnalysisSource, SNAPSHOT_BINS};
