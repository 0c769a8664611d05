//! Filter & aggregate stage.
//!
//! [`apply_filter`] validates a [`FilterCriteria`], selects the matching rows
//! of an enriched table in their original order, and computes every derived
//! view the dashboard needs in one pass. The table itself is only borrowed.

use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::debug;

use crate::error::FilterError;
use crate::metrics::MetricsCollector;
use crate::models::{EnrichedReview, SentimentCategory, Verification};
use crate::stats::{
    longest, shortest, ReviewSample, SentimentDistribution, SummaryStats, VerificationBreakdown,
};

/// Lower word bound the dashboard starts from when the data allows it
pub const DEFAULT_MIN_WORDS: usize = 50;

/// Inclusive `[min, max]` bound on word counts; always `min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordCountRange {
    min: usize,
    max: usize,
}

impl WordCountRange {
    /// Build a range, rejecting `min > max`
    pub fn new(min: usize, max: usize) -> Result<Self, FilterError> {
        if min > max {
            return Err(FilterError::InvertedRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// A range that admits every row
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            min: 0,
            max: usize::MAX,
        }
    }

    /// Smallest and largest word counts observed in `rows`, or `[0, 0]` if empty
    #[must_use]
    pub fn spanning(rows: &[EnrichedReview]) -> Self {
        let min = rows.iter().map(|r| r.word_count).min().unwrap_or(0);
        let max = rows.iter().map(|r| r.word_count).max().unwrap_or(0);
        Self { min, max }
    }

    /// Lower bound
    #[must_use]
    pub const fn min(&self) -> usize {
        self.min
    }

    /// Upper bound
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Whether `word_count` lies within the bounds
    #[must_use]
    pub const fn contains(&self, word_count: usize) -> bool {
        self.min <= word_count && word_count <= self.max
    }
}

impl Default for WordCountRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// User-selected predicates over the enriched table
///
/// Empty sets do not restrict their dimension. All predicates must hold for a
/// row to pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    /// Allowed verification statuses
    pub verification: BTreeSet<Verification>,
    /// Allowed sentiment categories
    pub sentiment: BTreeSet<SentimentCategory>,
    /// Allowed word counts
    pub word_count_range: WordCountRange,
}

impl FilterCriteria {
    /// Build criteria from typed selections
    pub fn new(
        verification: impl IntoIterator<Item = Verification>,
        sentiment: impl IntoIterator<Item = SentimentCategory>,
        word_count_range: WordCountRange,
    ) -> Self {
        Self {
            verification: verification.into_iter().collect(),
            sentiment: sentiment.into_iter().collect(),
            word_count_range,
        }
    }

    /// Build criteria from display labels, as a UI would submit them.
    ///
    /// Unknown labels and an inverted range are rejected before anything
    /// else happens.
    pub fn from_labels<V, S>(
        verification: &[V],
        sentiment: &[S],
        min_words: usize,
        max_words: usize,
    ) -> Result<Self, FilterError>
    where
        V: AsRef<str>,
        S: AsRef<str>,
    {
        let word_count_range = WordCountRange::new(min_words, max_words)?;

        let verification = verification
            .iter()
            .map(|label| {
                label
                    .as_ref()
                    .parse::<Verification>()
                    .map_err(FilterError::UnknownVerification)
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        let sentiment = sentiment
            .iter()
            .map(|label| {
                label
                    .as_ref()
                    .parse::<SentimentCategory>()
                    .map_err(FilterError::UnknownSentiment)
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Self {
            verification,
            sentiment,
            word_count_range,
        })
    }

    /// Criteria the dashboard opens with: every status and category, and
    /// word counts from `max(min_words, default_min_words)` up to the longest
    /// review. Falls back to the table minimum when the default exceeds the
    /// longest review.
    #[must_use]
    pub fn dashboard_default(rows: &[EnrichedReview], default_min_words: usize) -> Self {
        let span = WordCountRange::spanning(rows);
        let low = span.min().max(default_min_words);
        let range = WordCountRange::new(low, span.max()).unwrap_or(span);

        Self::new(Verification::ALL, SentimentCategory::ALL, range)
    }

    /// Check the criteria are coherent
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.word_count_range.min > self.word_count_range.max {
            return Err(FilterError::InvertedRange {
                min: self.word_count_range.min,
                max: self.word_count_range.max,
            });
        }
        Ok(())
    }

    /// Whether `row` passes every predicate
    #[must_use]
    pub fn matches(&self, row: &EnrichedReview) -> bool {
        (self.verification.is_empty() || self.verification.contains(&row.verification()))
            && (self.sentiment.is_empty() || self.sentiment.contains(&row.sentiment))
            && self.word_count_range.contains(row.word_count)
    }
}

/// The rows of an enriched table that passed a filter, with derived views
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    rows: Vec<&'a EnrichedReview>,
    summary: SummaryStats,
    distribution: SentimentDistribution,
    breakdown: VerificationBreakdown,
}

impl<'a> FilteredView<'a> {
    fn from_rows(rows: Vec<&'a EnrichedReview>) -> Self {
        let summary = SummaryStats::from_rows(&rows);
        let distribution = SentimentDistribution::from_rows(&rows);
        let breakdown = VerificationBreakdown::from_rows(&rows);
        Self {
            rows,
            summary,
            distribution,
            breakdown,
        }
    }

    /// Matching rows in their original order
    #[must_use]
    pub fn rows(&self) -> &[&'a EnrichedReview] {
        &self.rows
    }

    /// Number of matching rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing matched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Headline statistics
    #[must_use]
    pub const fn summary(&self) -> &SummaryStats {
        &self.summary
    }

    /// Count per sentiment category
    #[must_use]
    pub const fn distribution(&self) -> &SentimentDistribution {
        &self.distribution
    }

    /// Count per (verification, sentiment) pair
    #[must_use]
    pub const fn breakdown(&self) -> &VerificationBreakdown {
        &self.breakdown
    }

    /// Longest matching review, earliest first on ties
    #[must_use]
    pub fn longest(&self) -> Option<&'a EnrichedReview> {
        longest(&self.rows)
    }

    /// Shortest matching review, earliest first on ties
    #[must_use]
    pub fn shortest(&self) -> Option<&'a EnrichedReview> {
        shortest(&self.rows)
    }

    /// Matching rows ordered by compound score, highest first; ties keep
    /// their original order
    #[must_use]
    pub fn ranked_by_compound(&self) -> Vec<&'a EnrichedReview> {
        let mut ranked = self.rows.clone();
        ranked.sort_by(|a, b| b.compound.total_cmp(&a.compound));
        ranked
    }

    /// Owned, serializable summary of this view
    #[must_use]
    pub fn report(&self) -> FilterReport {
        FilterReport {
            summary: self.summary,
            distribution: self.distribution,
            breakdown: self.breakdown,
            longest: self.longest().map(ReviewSample::from),
            shortest: self.shortest().map(ReviewSample::from),
        }
    }
}

/// Everything a presentation layer shows for one filter selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterReport {
    /// Headline statistics
    pub summary: SummaryStats,
    /// Count per sentiment category
    pub distribution: SentimentDistribution,
    /// Count per (verification, sentiment) pair
    pub breakdown: VerificationBreakdown,
    /// Longest matching review
    pub longest: Option<ReviewSample>,
    /// Shortest matching review
    pub shortest: Option<ReviewSample>,
}

/// Filter `rows` by `criteria` and aggregate the result.
///
/// Invalid criteria are rejected before any row is inspected.
pub fn apply_filter<'a>(
    rows: &'a [EnrichedReview],
    criteria: &FilterCriteria,
) -> Result<FilteredView<'a>, FilterError> {
    criteria.validate()?;

    let started = Instant::now();
    let matched: Vec<&EnrichedReview> = rows.iter().filter(|r| criteria.matches(r)).collect();
    let view = FilteredView::from_rows(matched);

    MetricsCollector::default().record_filter(view.len(), started.elapsed());
    debug!(
        total = rows.len(),
        matched = view.len(),
        mean_compound = view.summary().mean_compound,
        "Applied review filter"
    );

    Ok(view)
}
