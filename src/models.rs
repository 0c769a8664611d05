//! Data models for review handling and enrichment
//!
//! This module contains the record types that flow through the preparation
//! pipeline and the filter stage: raw reviews, enriched reviews, and the two
//! categorical dimensions (verification status and sentiment category).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Compound scores strictly above this value are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores strictly below this value are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Provenance of a review as reported by the source platform
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Verification {
    /// The author's trip was verified by the platform
    Verified,
    /// No verification marker was present
    #[default]
    NotVerified,
}

impl Verification {
    /// Both values, in display order
    pub const ALL: [Self; 2] = [Self::Verified, Self::NotVerified];

    /// Classify free text by looking for the "Trip Verified" marker.
    ///
    /// Matching is case-insensitive. Anything without the marker, including
    /// empty text, is `NotVerified`.
    #[must_use]
    pub fn classify_marker(text: &str) -> Self {
        if text.to_lowercase().contains("trip verified") {
            Self::Verified
        } else {
            Self::NotVerified
        }
    }

    /// Classify the value of an explicit verification column.
    ///
    /// Accepts the marker text itself as well as common boolean spellings.
    /// Absent or unrecognised values are `NotVerified`.
    #[must_use]
    pub fn classify_field(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::NotVerified;
        };
        match value.trim().to_lowercase().as_str() {
            "trip verified" | "✅ trip verified" | "verified" | "true" | "yes" | "1" => {
                Self::Verified
            }
            _ => Self::NotVerified,
        }
    }

    /// Human readable label, as shown by the dashboard
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Verified => "Trip Verified",
            Self::NotVerified => "Not Verified",
        }
    }

    /// Position in [`Self::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Verified => 0,
            Self::NotVerified => 1,
        }
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Verification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "trip verified" | "verified" => Ok(Self::Verified),
            "not verified" | "notverified" | "unverified" => Ok(Self::NotVerified),
            _ => Err(s.to_string()),
        }
    }
}

/// Three-way sentiment label derived from a compound score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentCategory {
    /// Compound score above the positive threshold
    Positive,
    /// Compound score within the neutral band, inclusive of its edges
    Neutral,
    /// Compound score below the negative threshold
    Negative,
}

impl SentimentCategory {
    /// All categories, in display order
    pub const ALL: [Self; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    /// Map a compound score onto a category.
    ///
    /// `> 0.05` is positive, `< -0.05` is negative and everything else,
    /// including exactly ±0.05 and NaN, is neutral.
    #[must_use]
    pub fn from_compound(compound: f64) -> Self {
        if compound > POSITIVE_THRESHOLD {
            Self::Positive
        } else if compound < NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Human readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }

    /// Position in [`Self::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Positive => 0,
            Self::Neutral => 1,
            Self::Negative => 2,
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SentimentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            _ => Err(s.to_string()),
        }
    }
}

/// One row of the input dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Review {
    /// Review body, possibly still carrying the verification marker
    pub text: String,
    /// Verification status resolved at ingestion
    pub verified: Verification,
    /// Every other column, passed through untouched
    pub extra: BTreeMap<String, String>,
}

impl Review {
    /// Build a review whose verification status comes from the marker in its text
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let verified = Verification::classify_marker(&text);
        Self {
            text,
            verified,
            extra: BTreeMap::new(),
        }
    }

    /// Build a review with an explicit verification status
    #[must_use]
    pub fn new(text: impl Into<String>, verified: Verification) -> Self {
        Self {
            text: text.into(),
            verified,
            extra: BTreeMap::new(),
        }
    }
}

/// A review with its derived columns attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedReview {
    /// The source row
    pub review: Review,
    /// Text with verification markers removed
    pub clean_text: String,
    /// Whitespace-delimited token count of `clean_text`
    pub word_count: usize,
    /// Compound polarity score in `[-1, 1]`
    pub compound: f64,
    /// Category derived from `compound`
    pub sentiment: SentimentCategory,
}

impl EnrichedReview {
    /// Verification status of the underlying review
    #[must_use]
    pub const fn verification(&self) -> Verification {
        self.review.verified
    }
}

/// Output format for exported reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values format
    Csv,
    /// Plain text report
    Txt,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "txt" | "text" => Ok(Self::Txt),
            "json" => Ok(Self::Json),
            _ => Err(s.to_string()),
        }
    }
}
