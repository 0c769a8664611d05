//! Error types for the review-insights library.
//!
//! Library operations return [`InsightsError`]; filter validation and
//! per-row scoring failures have their own narrower enums so callers can
//! tell a rejected query from a broken input file.

use thiserror::Error;

/// Errors that can occur while loading, enriching or querying reviews.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited input that could not be recovered row by row
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the dataset header
    #[error("Expected a '{0}' column in the dataset")]
    MissingColumn(String),

    /// No input dataset could be located
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    /// Filter criteria were rejected before any filtering happened
    #[error("Invalid filter: {0}")]
    InvalidFilter(#[from] FilterError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with `InsightsError`
pub type Result<T> = std::result::Result<T, InsightsError>;

impl From<anyhow::Error> for InsightsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

/// Reasons a set of filter criteria is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Lower word-count bound above the upper bound
    #[error("word count range is inverted: min {min} > max {max}")]
    InvertedRange {
        /// Requested lower bound
        min: usize,
        /// Requested upper bound
        max: usize,
    },

    /// Verification label outside {Trip Verified, Not Verified}
    #[error("unknown verification status: '{0}'")]
    UnknownVerification(String),

    /// Sentiment label outside {Positive, Neutral, Negative}
    #[error("unknown sentiment category: '{0}'")]
    UnknownSentiment(String),
}

/// Failure of the sentiment scorer on a single text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// Text exceeds the scorer's configured length limit
    #[error("text too long to score ({len} > {max} characters)")]
    TextTooLong {
        /// Length of the rejected text in characters
        len: usize,
        /// Configured maximum
        max: usize,
    },

    /// Text the scorer cannot interpret
    #[error("text cannot be scored: {0}")]
    InvalidText(String),
}
