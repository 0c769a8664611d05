//! Review Insights - Sentiment Enrichment and Filtering for Review Datasets
//!
//! A Rust library for loading customer review datasets, scoring each review
//! with the VADER sentiment analyzer, and slicing the enriched table
//! the way an interactive dashboard does.
//!
//! # Features
//!
//! - Load reviews from CSV, deriving "Trip Verified" status
//! - Word counts, compound scores and Positive/Neutral/Negative labels
//! - Filtering by verification, sentiment and word-count range
//! - Summary statistics, sentiment distribution and verification cross-tab
//! - Process-wide cache keyed by dataset identity

/// Dataset cache
pub mod cache;
/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// Export of filtered reviews
pub mod file_writer;
/// Filter and aggregate stage
pub mod filter;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Preparation pipeline
pub mod pipeline;
/// Review sources
pub mod repository;
/// Sentiment scoring
pub mod sentiment;
/// Service facade
pub mod service;
/// Summary statistics and aggregates
pub mod stats;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use cache::{DatasetCache, EnrichedTable};
pub use error::{FilterError, InsightsError, Result, ScoringError};
pub use filter::{apply_filter, FilterCriteria, FilterReport, FilteredView, WordCountRange};
pub use models::{EnrichedReview, OutputFormat, Review, SentimentCategory, Verification};
pub use pipeline::{enrich_reviews, EnrichmentReport};
pub use repository::{CsvReviewSource, MemoryReviewSource, ReviewSource};
pub use sentiment::{SentimentScorer, VaderScorer};
pub use service::InsightsService;
pub use stats::{SentimentDistribution, SummaryStats, VerificationBreakdown};
