use anyhow::Result;
use metrics::{counter, gauge, histogram};
use std::time::Duration;

use crate::models::SentimentCategory;
use crate::pipeline::EnrichmentReport;

/// Metrics collection and management
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector {
    // Ingestion metrics
    pub reviews_loaded_total: &'static str,
    pub malformed_rows_total: &'static str,

    // Enrichment metrics
    pub reviews_enriched_total: &'static str,
    pub scoring_failures_total: &'static str,
    pub enrichment_duration: &'static str,
    pub sentiment_total: &'static str,
    pub compound_scores: &'static str,

    // Query metrics
    pub filter_operations_total: &'static str,
    pub filter_duration: &'static str,
    pub filtered_rows: &'static str,

    // Cache metrics
    pub cache_hits_total: &'static str,
    pub cache_misses_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            reviews_loaded_total: "review_insights_reviews_loaded_total",
            malformed_rows_total: "review_insights_malformed_rows_total",

            reviews_enriched_total: "review_insights_reviews_enriched_total",
            scoring_failures_total: "review_insights_scoring_failures_total",
            enrichment_duration: "review_insights_enrichment_duration_seconds",
            sentiment_total: "review_insights_sentiment_total",
            compound_scores: "review_insights_compound_scores",

            filter_operations_total: "review_insights_filter_operations_total",
            filter_duration: "review_insights_filter_duration_seconds",
            filtered_rows: "review_insights_filtered_rows",

            cache_hits_total: "review_insights_cache_hits_total",
            cache_misses_total: "review_insights_cache_misses_total",
        }
    }
}

impl MetricsCollector {
    /// Initialize metrics collection
    pub fn init() -> Result<()> {
        metrics::set_global_recorder(metrics::NoopRecorder)
            .map_err(|_| anyhow::anyhow!("Failed to initialize metrics recorder: already set"))?;

        Ok(())
    }

    /// Record rows read from a dataset
    pub fn record_load(&self, rows: usize, malformed: usize) {
        counter!(self.reviews_loaded_total).increment(rows as u64);
        if malformed > 0 {
            counter!(self.malformed_rows_total).increment(malformed as u64);
        }
    }

    /// Record the outcome of one pipeline run
    pub fn record_enrichment(&self, report: &EnrichmentReport, duration: Duration) {
        counter!(self.reviews_enriched_total).increment(report.scored as u64);
        if report.failed > 0 {
            counter!(self.scoring_failures_total).increment(report.failed as u64);
        }
        histogram!(self.enrichment_duration).record(duration.as_secs_f64());
    }

    /// Record the score and category of one enriched review
    pub fn record_sentiment(&self, category: SentimentCategory, compound: f64) {
        counter!(self.sentiment_total, "category" => category.label()).increment(1);
        histogram!(self.compound_scores).record(compound);
    }

    /// Record one filter-and-aggregate pass
    pub fn record_filter(&self, matched: usize, duration: Duration) {
        counter!(self.filter_operations_total).increment(1);
        histogram!(self.filter_duration).record(duration.as_secs_f64());
        gauge!(self.filtered_rows).set(matched as f64);
    }

    /// Record a dataset cache lookup
    pub fn record_cache_lookup(&self, hit: bool) {
        if hit {
            counter!(self.cache_hits_total).increment(1);
        } else {
            counter!(self.cache_misses_total).increment(1);
        }
    }
}
