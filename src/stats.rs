//! Summary statistics and grouped aggregates over a set of enriched reviews.
//!
//! Every aggregate reports all of its categories, with zero counts where no
//! row falls into a bucket, so a presentation layer never has to fill gaps.

use serde::{Serialize, Serializer};

use crate::models::{EnrichedReview, SentimentCategory, Verification};

/// Headline numbers of a filtered subset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Number of rows in the subset
    pub count: usize,
    /// Mean compound score, `0.0` when the subset is empty
    pub mean_compound: f64,
    /// Share of positive rows in `[0, 1]`, `0.0` when the subset is empty
    pub positive_share: f64,
}

impl SummaryStats {
    /// Statistics of an empty subset
    pub const EMPTY: Self = Self {
        count: 0,
        mean_compound: 0.0,
        positive_share: 0.0,
    };

    /// Compute statistics over `rows`
    #[must_use]
    pub fn from_rows(rows: &[&EnrichedReview]) -> Self {
        if rows.is_empty() {
            return Self::EMPTY;
        }

        let count = rows.len();
        let total: f64 = rows.iter().map(|r| r.compound).sum();
        let positive = rows
            .iter()
            .filter(|r| r.sentiment == SentimentCategory::Positive)
            .count();

        Self {
            count,
            mean_compound: total / count as f64,
            positive_share: positive as f64 / count as f64,
        }
    }
}

/// Count of rows per sentiment category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentDistribution {
    counts: [usize; 3],
}

impl SentimentDistribution {
    /// Tally the categories of `rows`
    #[must_use]
    pub fn from_rows(rows: &[&EnrichedReview]) -> Self {
        let mut counts = [0; 3];
        for row in rows {
            counts[row.sentiment.index()] += 1;
        }
        Self { counts }
    }

    /// Rows in `category`
    #[must_use]
    pub const fn get(&self, category: SentimentCategory) -> usize {
        self.counts[category.index()]
    }

    /// Every category with its count, in display order
    pub fn iter(&self) -> impl Iterator<Item = (SentimentCategory, usize)> + '_ {
        SentimentCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Sum over all categories
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl Serialize for SentimentDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(c, n)| (c.label(), n)))
    }
}

/// One cell of the verification × sentiment cross-tabulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakdownCell {
    /// Row dimension
    pub verification: Verification,
    /// Column dimension
    pub sentiment: SentimentCategory,
    /// Rows in this cell
    pub count: usize,
}

/// Cross-tabulation of verification status against sentiment category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerificationBreakdown {
    counts: [[usize; 3]; 2],
}

impl VerificationBreakdown {
    /// Tally `rows` by (verification, sentiment)
    #[must_use]
    pub fn from_rows(rows: &[&EnrichedReview]) -> Self {
        let mut counts = [[0; 3]; 2];
        for row in rows {
            counts[row.verification().index()][row.sentiment.index()] += 1;
        }
        Self { counts }
    }

    /// Rows in one cell
    #[must_use]
    pub const fn get(&self, verification: Verification, sentiment: SentimentCategory) -> usize {
        self.counts[verification.index()][sentiment.index()]
    }

    /// All six cells, verification-major
    pub fn iter(&self) -> impl Iterator<Item = BreakdownCell> + '_ {
        Verification::ALL.into_iter().flat_map(move |verification| {
            SentimentCategory::ALL
                .into_iter()
                .map(move |sentiment| BreakdownCell {
                    verification,
                    sentiment,
                    count: self.get(verification, sentiment),
                })
        })
    }

    /// Rows with the given verification status, across all categories
    #[must_use]
    pub fn row_total(&self, verification: Verification) -> usize {
        self.counts[verification.index()].iter().sum()
    }

    /// Sum over all cells
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

impl Serialize for VerificationBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Owned snapshot of a single review, for reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSample {
    /// Cleaned review body
    pub text: String,
    /// Token count
    pub word_count: usize,
    /// Compound score
    pub compound: f64,
    /// Sentiment category
    pub sentiment: SentimentCategory,
    /// Verification status
    pub verification: Verification,
}

impl From<&EnrichedReview> for ReviewSample {
    fn from(row: &EnrichedReview) -> Self {
        Self {
            text: row.clean_text.clone(),
            word_count: row.word_count,
            compound: row.compound,
            sentiment: row.sentiment,
            verification: row.verification(),
        }
    }
}

/// Row with the most words; the earliest one wins ties
#[must_use]
pub fn longest<'a>(rows: &[&'a EnrichedReview]) -> Option<&'a EnrichedReview> {
    let mut best: Option<&EnrichedReview> = None;
    for &row in rows {
        if best.map_or(true, |b| row.word_count > b.word_count) {
            best = Some(row);
        }
    }
    best
}

/// Row with the fewest words; the earliest one wins ties
#[must_use]
pub fn shortest<'a>(rows: &[&'a EnrichedReview]) -> Option<&'a EnrichedReview> {
    let mut best: Option<&EnrichedReview> = None;
    for &row in rows {
        if best.map_or(true, |b| row.word_count < b.word_count) {
            best = Some(row);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Review;

    fn row(text: &str, compound: f64, verified: Verification) -> EnrichedReview {
        EnrichedReview {
            review: Review::new(text, verified),
            clean_text: text.to_string(),
            word_count: text.split_whitespace().count(),
            compound,
            sentiment: SentimentCategory::from_compound(compound),
        }
    }

    #[test]
    fn test_empty_summary_uses_sentinels() {
        let stats = SummaryStats::from_rows(&[]);
        assert_eq!(stats, SummaryStats::EMPTY);
        assert!(!stats.mean_compound.is_nan());
    }

    #[test]
    fn test_summary_values() {
        let a = row("good trip", 0.8, Verification::Verified);
        let b = row("meh", 0.0, Verification::NotVerified);
        let stats = SummaryStats::from_rows(&[&a, &b]);
        assert_eq!(stats.count, 2);
        assert!((stats.mean_compound - 0.4).abs() < 1e-12);
        assert!((stats.positive_share - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_aggregates_list_every_bucket() {
        let a = row("good trip", 0.8, Verification::Verified);
        let dist = SentimentDistribution::from_rows(&[&a]);
        assert_eq!(dist.iter().count(), 3);
        assert_eq!(dist.get(SentimentCategory::Negative), 0);

        let cross = VerificationBreakdown::from_rows(&[&a]);
        assert_eq!(cross.iter().count(), 6);
        assert_eq!(cross.get(Verification::Verified, SentimentCategory::Positive), 1);
        assert_eq!(cross.row_total(Verification::NotVerified), 0);
    }

    #[test]
    fn test_samples_prefer_first_on_ties() {
        let a = row("one two", 0.1, Verification::Verified);
        let b = row("three four", 0.2, Verification::Verified);
        let c = row("five", 0.3, Verification::Verified);
        let d = row("six", 0.4, Verification::Verified);
        let rows = [&a, &b, &c, &d];
        assert!(std::ptr::eq(longest(&rows).expect("non-empty"), &a));
        assert!(std::ptr::eq(shortest(&rows).expect("non-empty"), &c));
        assert!(longest(&[]).is_none());
        assert!(shortest(&[]).is_none());
    }

    #[test]
    fn test_distribution_serializes_as_label_map() {
        let a = row("good trip", 0.8, Verification::Verified);
        let json = serde_json::to_value(SentimentDistribution::from_rows(&[&a]))
            .expect("serializable");
        assert_eq!(json["Positive"], 1);
        assert_eq!(json["Neutral"], 0);
    }
}
