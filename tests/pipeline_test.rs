//! Integration tests for the preparation pipeline

use mockall::mock;
use review_insights::error::ScoringError;
use review_insights::filter::{apply_filter, FilterCriteria, WordCountRange};
use review_insights::models::{Review, SentimentCategory, Verification};
use review_insights::pipeline::{enrich_review, enrich_reviews};
use review_insights::sentiment::{SentimentScorer, VaderScorer};

mock! {
    pub Scorer {}

    impl SentimentScorer for Scorer {
        fn score(&self, text: &str) -> Result<f64, ScoringError>;
    }
}

fn stub_scorer(text: &str) -> Result<f64, ScoringError> {
    if text.starts_with("Great") {
        Ok(0.8)
    } else if text.starts_with("Terrible") {
        Ok(-0.7)
    } else {
        Ok(0.0)
    }
}

fn flight_reviews() -> Vec<Review> {
    vec![
        Review::new("Great flight, excellent crew", Verification::Verified),
        Review::new("Terrible delay, awful service", Verification::NotVerified),
    ]
}

#[test]
fn test_stub_scores_flow_into_filter() {
    let (rows, report) = enrich_reviews(&flight_reviews(), &stub_scorer);
    assert_eq!(report.total, 2);
    assert_eq!(report.failed, 0);

    let categories: Vec<_> = rows.iter().map(|r| r.sentiment).collect();
    assert_eq!(
        categories,
        vec![SentimentCategory::Positive, SentimentCategory::Negative]
    );

    let criteria = FilterCriteria::new(
        Verification::ALL,
        [SentimentCategory::Positive],
        WordCountRange::unbounded(),
    );
    let view = apply_filter(&rows, &criteria).expect("valid criteria");
    let summary = view.summary();
    assert_eq!(summary.count, 1);
    assert!((summary.mean_compound - 0.8).abs() < f64::EPSILON);
    assert!((summary.positive_share - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_scorer_called_once_per_review() {
    let mut scorer = MockScorer::new();
    scorer
        .expect_score()
        .withf(|text| text == "Great flight, excellent crew")
        .times(1)
        .returning(|_| Ok(0.8));
    scorer
        .expect_score()
        .withf(|text| text == "Terrible delay, awful service")
        .times(1)
        .returning(|_| Ok(-0.7));

    let (rows, _) = enrich_reviews(&flight_reviews(), &scorer);
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_scorer_sees_text_without_marker() {
    let mut scorer = MockScorer::new();
    scorer
        .expect_score()
        .withf(|text| text == "Smooth boarding and a friendly crew.")
        .times(1)
        .returning(|_| Ok(0.6));

    let review = Review::from_text("✅ Trip Verified | Smooth boarding and a friendly crew.");
    let (row, scored) = enrich_review(&review, &scorer);
    assert!(scored);
    assert_eq!(row.verification(), Verification::Verified);
    assert_eq!(row.word_count, 6);
}

#[test]
fn test_failing_row_does_not_abort_batch() {
    let mut scorer = MockScorer::new();
    scorer
        .expect_score()
        .withf(|text| text.contains('\u{fffd}'))
        .returning(|_| Err(ScoringError::InvalidText("bad encoding".to_string())));
    scorer.expect_score().returning(|_| Ok(0.5));

    let reviews = vec![
        Review::from_text("fine"),
        Review::from_text("broken \u{fffd} text"),
        Review::from_text("also fine"),
    ];
    let (rows, report) = enrich_reviews(&reviews, &scorer);

    assert_eq!(rows.len(), 3);
    assert_eq!(report.scored, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(rows[1].sentiment, SentimentCategory::Neutral);
    assert!(rows[1].compound.abs() < f64::EPSILON);
    assert_eq!(rows[2].sentiment, SentimentCategory::Positive);
}

#[test]
fn test_nan_and_out_of_range_scores() {
    let scorer = |text: &str| -> Result<f64, ScoringError> {
        if text == "nan" {
            Ok(f64::NAN)
        } else {
            Ok(3.0)
        }
    };

    let (rows, report) = enrich_reviews(
        &[Review::from_text("nan"), Review::from_text("huge")],
        &scorer,
    );
    assert_eq!(report.failed, 1);
    assert_eq!(rows[0].sentiment, SentimentCategory::Neutral);
    assert!((rows[1].compound - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_enrichment_is_idempotent() {
    let scorer = VaderScorer::new();
    let review = Review::from_text("Not Verified | The seats were great but the food was awful");

    let (first, _) = enrich_review(&review, &scorer);
    let (second, _) = enrich_review(&first.review, &scorer);
    assert_eq!(first, second);

    let (reclean, _) = enrich_review(&Review::from_text(first.clean_text.clone()), &scorer);
    assert_eq!(reclean.clean_text, first.clean_text);
    assert_eq!(reclean.word_count, first.word_count);
    assert!((reclean.compound - first.compound).abs() < f64::EPSILON);
}

#[test]
fn test_empty_input_yields_empty_table() {
    let (rows, report) = enrich_reviews(&[], &VaderScorer::new());
    assert!(rows.is_empty());
    assert_eq!(report.total, 0);
}

#[test]
fn test_order_and_length_preserved() {
    let reviews: Vec<Review> = (0..20)
        .map(|i| Review::from_text(format!("review number {i}")))
        .collect();
    let (rows, _) = enrich_reviews(&reviews, &VaderScorer::new());

    assert_eq!(rows.len(), reviews.len());
    for (row, review) in rows.iter().zip(&reviews) {
        assert_eq!(&row.review, review);
    }
}
