//! Process-wide cache of enriched tables.
//!
//! Tables are keyed by the identity of their source and the scorer that
//! enriched them, and are shared read-only behind an [`Arc`].

use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::{debug, info};

use crate::error::{InsightsError, Result};
use crate::metrics::MetricsCollector;
use crate::models::EnrichedReview;
use crate::pipeline::{enrich_reviews, EnrichmentReport};
use crate::repository::{ReviewSource, SourceKey};
use crate::sentiment::SentimentScorer;

/// An enriched dataset, immutable once built
#[derive(Debug)]
pub struct EnrichedTable {
    /// Identity of the source this table was built from
    pub source: SourceKey,
    /// Id of the scorer that produced the compound scores
    pub scorer_id: String,
    /// Enriched rows in source order
    pub rows: Vec<EnrichedReview>,
    /// Outcome of the enrichment run
    pub report: EnrichmentReport,
    /// When the table was built
    pub loaded_at: DateTime<Local>,
}

impl EnrichedTable {
    /// Load `source` and run the preparation pipeline over it
    pub fn build(source: &dyn ReviewSource, scorer: &dyn SentimentScorer) -> Result<Self> {
        let key = source.identity()?;
        let reviews = source.load()?;
        let (rows, report) = enrich_reviews(&reviews, scorer);
        Ok(Self {
            source: key,
            scorer_id: scorer.scorer_id(),
            rows,
            report,
            loaded_at: Local::now(),
        })
    }
}

/// Source identity plus scorer id
type TableKey = (SourceKey, String);

/// Enriched tables keyed by source identity and scorer.
///
/// The pipeline runs at most once per distinct key. When a source changes,
/// its new identity replaces the entry for the same location and scorer.
#[derive(Debug, Default)]
pub struct DatasetCache {
    tables: Mutex<HashMap<TableKey, Arc<EnrichedTable>>>,
}

static GLOBAL_CACHE: OnceLock<Arc<DatasetCache>> = OnceLock::new();

impl DatasetCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache instance
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL_CACHE.get_or_init(|| Arc::new(Self::new())))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TableKey, Arc<EnrichedTable>>>> {
        self.tables
            .lock()
            .map_err(|e| InsightsError::Cache(format!("cache lock poisoned: {e}")))
    }

    /// Return the cached table for `source` scored by `scorer`, building it
    /// on first use.
    ///
    /// Scorers are told apart by [`SentimentScorer::scorer_id`]. The lock is
    /// held while building, so concurrent callers asking for the same key wait
    /// for the single pipeline run instead of repeating it.
    pub fn get_or_load(
        &self,
        source: &dyn ReviewSource,
        scorer: &dyn SentimentScorer,
    ) -> Result<Arc<EnrichedTable>> {
        let key = (source.identity()?, scorer.scorer_id());
        let metrics = MetricsCollector::default();
        let mut tables = self.lock()?;

        if let Some(table) = tables.get(&key) {
            debug!(location = %key.0.location.display(), scorer = %key.1, "Dataset cache hit");
            metrics.record_cache_lookup(true);
            return Ok(Arc::clone(table));
        }
        metrics.record_cache_lookup(false);

        let stale = tables
            .keys()
            .filter(|(cached, scorer_id)| cached.location == key.0.location && *scorer_id == key.1)
            .cloned()
            .collect::<Vec<_>>();
        for old in stale {
            info!(location = %old.0.location.display(), "Source changed, evicting cached table");
            tables.remove(&old);
        }

        let table = Arc::new(EnrichedTable::build(source, scorer)?);
        info!(
            location = %key.0.location.display(),
            scorer = %key.1,
            rows = table.rows.len(),
            loaded_at = %table.loaded_at.format("%Y-%m-%d %H:%M:%S"),
            "Cached enriched table"
        );
        tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Drop every cached table built from `location`
    pub fn invalidate(&self, location: &Path) -> Result<usize> {
        let mut tables = self.lock()?;
        let before = tables.len();
        tables.retain(|(cached, _), _| cached.location != location);
        Ok(before - tables.len())
    }

    /// Drop every cached table
    pub fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    /// Number of cached tables
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Whether the cache holds no tables
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }
}
