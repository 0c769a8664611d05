//! Sentiment scoring.
//!
//! The pipeline only depends on the [`SentimentScorer`] trait, so any scorer
//! can be injected. The bundled [`VaderScorer`] delegates to the VADER
//! analyzer from the `vader_sentiment` crate and reports its compound score.

use std::fmt;
use unicode_normalization::UnicodeNormalization;
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::error::ScoringError;

/// Anything that can turn a review into a compound polarity score.
///
/// Implementations must be deterministic for a given text and return values
/// in `[-1, 1]`.
pub trait SentimentScorer: Send + Sync {
    /// Score a single text
    fn score(&self, text: &str) -> Result<f64, ScoringError>;

    /// Identifies the scorer and its settings; tables built by scorers with
    /// different ids are cached separately.
    ///
    /// Defaults to the type name. Closures declared in the same function
    /// share a type name, so scorers with settings should override this.
    fn scorer_id(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<F> SentimentScorer for F
where
    F: Fn(&str) -> Result<f64, ScoringError> + Send + Sync,
{
    fn score(&self, text: &str) -> Result<f64, ScoringError> {
        self(text)
    }
}

/// Default upper bound on the length of a text the bundled scorer accepts
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 50_000;

/// VADER compound scorer with input guards
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
    max_text_length: usize,
}

impl fmt::Debug for VaderScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaderScorer")
            .field("max_text_length", &self.max_text_length)
            .finish_non_exhaustive()
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl VaderScorer {
    /// Create a scorer with the bundled VADER lexicon
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_text_length(DEFAULT_MAX_TEXT_LENGTH)
    }

    /// Create a scorer that rejects texts longer than `max_text_length` characters
    #[must_use]
    pub fn with_max_text_length(max_text_length: usize) -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
            max_text_length,
        }
    }

    /// Longest text, in characters, this scorer accepts
    #[must_use]
    pub const fn max_text_length(&self) -> usize {
        self.max_text_length
    }
}

impl SentimentScorer for VaderScorer {
    fn score(&self, text: &str) -> Result<f64, ScoringError> {
        let len = text.chars().count();
        if len > self.max_text_length {
            return Err(ScoringError::TextTooLong {
                len,
                max: self.max_text_length,
            });
        }
        if text.contains('\0') {
            return Err(ScoringError::InvalidText(
                "embedded NUL character".to_string(),
            ));
        }

        let normalized: String = text.nfc().collect();
        let scores = self.analyzer.polarity_scores(&normalized);
        scores
            .get("compound")
            .copied()
            .map(|compound| compound.clamp(-1.0, 1.0))
            .ok_or_else(|| ScoringError::InvalidText("analyzer returned no compound score".to_string()))
    }

    fn scorer_id(&self) -> String {
        format!("vader(max_text_length={})", self.max_text_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> f64 {
        VaderScorer::new().score(text).expect("scoring should succeed")
    }

    #[test]
    fn test_empty_text_is_exactly_neutral() {
        assert_eq!(score(""), 0.0);
    }

    #[test]
    fn test_polarity() {
        assert!(score("Great flight, excellent crew") > 0.05);
        assert!(score("Terrible delay, awful service") < -0.05);
        assert!(score("Staff were courteous, seat was roomy, would fly again") > 0.05);
        assert_eq!(score("The flight departed at noon"), 0.0);
    }

    #[test]
    fn test_negation_flips_sign() {
        assert!(score("The crew was good") > 0.0);
        assert!(score("The crew was not good") < 0.0);
    }

    #[test]
    fn test_boosters_intensify() {
        let plain = score("The food was good");
        assert!(score("The food was very good") > plain);
    }

    #[test]
    fn test_but_shifts_weight_to_second_clause() {
        assert!(score("The seat was comfortable but the food was terrible") < 0.0);
        assert!(score("The food was terrible but the crew was excellent") > 0.0);
    }

    #[test]
    fn test_exclamation_amplifies() {
        assert!(score("Great flight!!!") > score("Great flight"));
        assert!(score("Awful flight!!!") < score("Awful flight"));
    }

    #[test]
    fn test_compound_is_bounded() {
        let gushing = "excellent ".repeat(500);
        let s = score(&gushing);
        assert!(s <= 1.0 && s > 0.99);
    }

    #[test]
    fn test_rejects_oversized_and_nul_text() {
        let scorer = VaderScorer::with_max_text_length(10);
        assert_eq!(
            scorer.score("this text is too long"),
            Err(ScoringError::TextTooLong { len: 21, max: 10 })
        );
        assert!(matches!(
            VaderScorer::new().score("bad\0byte"),
            Err(ScoringError::InvalidText(_))
        ));
    }

    #[test]
    fn test_scorer_id_reflects_settings() {
        assert_ne!(
            VaderScorer::new().scorer_id(),
            VaderScorer::with_max_text_length(10).scorer_id()
        );
    }

    #[test]
    fn test_closures_are_scorers() {
        let stub = |text: &str| -> Result<f64, ScoringError> {
            Ok(if text.is_empty() { 0.0 } else { 0.5 })
        };
        assert_eq!(stub.score("anything"), Ok(0.5));
    }
}
