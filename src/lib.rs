pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod normalize;
pub mod plots;
pub mod stats;

pub use config::{AnalysisConfig, CategoryMissPolicy, RegionGroups};
pub use error::{AnalyzerError, Result};
pub use model::*;
pub use normalize::{normalize, NormalizeSummary, Normalizer};
