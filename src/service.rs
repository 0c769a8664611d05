//! Service facade over a review source, a scorer and the dataset cache.

use std::sync::Arc;
use tracing::info;

use crate::cache::{DatasetCache, EnrichedTable};
use crate::config::AppConfig;
use crate::error::Result;
use crate::filter::{apply_filter, FilterCriteria, FilterReport};
use crate::repository::{CsvReviewSource, ReviewSource};
use crate::sentiment::{SentimentScorer, VaderScorer};

/// Ties a review source, a scorer and a dataset cache together
pub struct InsightsService {
    source: Box<dyn ReviewSource>,
    scorer: Arc<dyn SentimentScorer>,
    cache: Arc<DatasetCache>,
    default_min_words: usize,
}

impl InsightsService {
    /// Service over `source` scored by `scorer`, sharing tables through `cache`
    pub fn new(
        source: Box<dyn ReviewSource>,
        scorer: Arc<dyn SentimentScorer>,
        cache: Arc<DatasetCache>,
    ) -> Self {
        Self {
            source,
            scorer,
            cache,
            default_min_words: crate::filter::DEFAULT_MIN_WORDS,
        }
    }

    /// Override the lower word-count bound the default criteria start from
    #[must_use]
    pub fn with_default_min_words(mut self, default_min_words: usize) -> Self {
        self.default_min_words = default_min_words;
        self
    }

    /// Service over the configured CSV dataset with the bundled VADER scorer
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let source = CsvReviewSource::from_config(&config.data)?;
        let scorer = VaderScorer::with_max_text_length(config.analysis.max_text_length);
        Ok(Self::new(
            Box::new(source),
            Arc::new(scorer),
            DatasetCache::global(),
        )
        .with_default_min_words(config.analysis.default_min_words))
    }

    /// The enriched table, built on first use and reused while the source is unchanged
    pub fn table(&self) -> Result<Arc<EnrichedTable>> {
        self.cache.get_or_load(self.source.as_ref(), self.scorer.as_ref())
    }

    /// Criteria the dashboard opens with for the current table
    pub fn default_criteria(&self) -> Result<FilterCriteria> {
        let table = self.table()?;
        Ok(FilterCriteria::dashboard_default(
            &table.rows,
            self.default_min_words,
        ))
    }

    /// Validate `criteria`, filter the current table and aggregate the result
    pub fn query(&self, criteria: &FilterCriteria) -> Result<FilterReport> {
        criteria.validate()?;
        let table = self.table()?;
        let view = apply_filter(&table.rows, criteria)?;
        info!(
            matched = view.len(),
            total = table.rows.len(),
            "Answered review query"
        );
        Ok(view.report())
    }
}
