use crate::plots::PlotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("No category named for id {category_id} (video {video_id}, country {country_code})")]
    MissingCategory {
        country_code: String,
        video_id: String,
        category_id: String,
    },

    #[error("Malformed video item in bundle {country_code}: {reason}")]
    MalformedVideo { country_code: String, reason: String },

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Contingency table is degenerate: {0}")]
    DegenerateContingency(String),

    #[error("Statistics error: {0}")]
    Stats(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Plot error: {0}")]
    Plot(#[from] PlotError),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
