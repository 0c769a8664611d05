//! Preparation pipeline: raw reviews in, enriched reviews out.
//!
//! Each review is cleaned of its verification marker, measured, and scored
//! exactly once. A scorer failure on one row is logged and that row falls
//! back to a neutral score so the rest of the batch still completes.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{EnrichedReview, Review, SentimentCategory};
use crate::sentiment::SentimentScorer;

static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();

// Literal pattern, compiled once.
#[allow(clippy::expect_used)]
fn marker_regex() -> &'static Regex {
    MARKER_REGEX.get_or_init(|| {
        Regex::new(r"(?i)(?:✅\s*)?(?:trip|not)\s+verified\s*\|")
            .expect("verification marker pattern is valid")
    })
}

/// Remove the "✅ Trip Verified |" / "Not Verified |" markers and trim.
///
/// Applying this to already-clean text returns it unchanged.
#[must_use]
pub fn clean_review_text(text: &str) -> String {
    marker_regex().replace_all(text, "").trim().to_string()
}

/// Number of whitespace-delimited tokens
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Outcome counters of one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentReport {
    /// Rows handed to the pipeline
    pub total: usize,
    /// Rows scored successfully
    pub scored: usize,
    /// Rows that fell back to a neutral score after a scorer failure
    pub failed: usize,
}

/// Enrich a single review.
///
/// Derived fields are always recomputed from `review.text`, so enriching the
/// `review` of an existing [`EnrichedReview`] again yields the same values.
/// Returns whether the scorer succeeded alongside the row.
pub fn enrich_review(review: &Review, scorer: &dyn SentimentScorer) -> (EnrichedReview, bool) {
    let clean_text = clean_review_text(&review.text);
    let word_count = word_count(&clean_text);

    let (compound, scored) = match scorer.score(&clean_text) {
        Ok(raw) if raw.is_nan() => {
            warn!("Scorer returned NaN, treating review as neutral");
            (0.0, false)
        }
        Ok(raw) => {
            if !(-1.0..=1.0).contains(&raw) {
                warn!(compound = raw, "Scorer returned a value outside [-1, 1], clamping");
            }
            (raw.clamp(-1.0, 1.0), true)
        }
        Err(e) => {
            warn!(error = %e, word_count, "Sentiment scoring failed, treating review as neutral");
            (0.0, false)
        }
    };

    let enriched = EnrichedReview {
        review: review.clone(),
        clean_text,
        word_count,
        compound,
        sentiment: SentimentCategory::from_compound(compound),
    };

    (enriched, scored)
}

/// Run the preparation pipeline over an ordered batch of reviews.
///
/// The output has the same length and order as `reviews`; the input is not
/// modified.
pub fn enrich_reviews(
    reviews: &[Review],
    scorer: &dyn SentimentScorer,
) -> (Vec<EnrichedReview>, EnrichmentReport) {
    let timer = OperationTimer::new("enrich_reviews");
    let started = Instant::now();
    let metrics = MetricsCollector::default();

    let mut report = EnrichmentReport {
        total: reviews.len(),
        ..EnrichmentReport::default()
    };
    let mut enriched = Vec::with_capacity(reviews.len());

    for (index, review) in reviews.iter().enumerate() {
        let (row, scored) = enrich_review(review, scorer);
        if scored {
            report.scored += 1;
        } else {
            report.failed += 1;
            debug!(row = index, "Row assigned neutral fallback");
        }
        metrics.record_sentiment(row.sentiment, row.compound);
        enriched.push(row);
    }

    metrics.record_enrichment(&report, started.elapsed());
    info!(
        total = report.total,
        scored = report.scored,
        failed = report.failed,
        "Enriched reviews"
    );
    timer.finish();

    (enriched, report)
}
