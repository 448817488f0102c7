//! Data models for wine samples, ideal ranges and predictions.

pub mod features;
pub mod prediction;
pub mod ranges;

pub use features::{Feature, FeatureVector, FEATURE_COUNT};
pub use prediction::{PredictionResult, QualityLabel};
pub use ranges::{RangeEntry, RANGES_NOTE, RANGE_TABLE};
