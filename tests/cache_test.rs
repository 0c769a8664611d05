//! Integration tests for the dataset cache

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

use review_insights::cache::DatasetCache;
use review_insights::error::ScoringError;
use review_insights::models::Review;
use review_insights::repository::{CsvReviewSource, MemoryReviewSource, ReviewSource};
use review_insights::sentiment::VaderScorer;

fn counting_scorer(calls: Arc<AtomicUsize>) -> impl Fn(&str) -> Result<f64, ScoringError> + Send + Sync {
    move |_text: &str| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(0.4)
    }
}

fn reviews(n: usize) -> Vec<Review> {
    (0..n)
        .map(|i| Review::from_text(format!("Trip Verified | review {i}")))
        .collect()
}

#[test]
fn test_pipeline_runs_once_per_source() {
    let calls = Arc::new(AtomicUsize::new(0));
    let scorer = counting_scorer(Arc::clone(&calls));
    let cache = DatasetCache::new();
    let source = MemoryReviewSource::new("fixture", reviews(3));

    let first = cache.get_or_load(&source, &scorer).expect("load");
    let second = cache.get_or_load(&source, &scorer).expect("load");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(cache.len().expect("len"), 1);
}

#[test]
fn test_changed_source_is_reloaded() {
    let calls = Arc::new(AtomicUsize::new(0));
    let scorer = counting_scorer(Arc::clone(&calls));
    let cache = DatasetCache::new();
    let mut source = MemoryReviewSource::new("fixture", reviews(2));

    let first = cache.get_or_load(&source, &scorer).expect("load");
    source.replace(reviews(5));
    let second = cache.get_or_load(&source, &scorer).expect("load");

    assert_eq!(first.rows.len(), 2);
    assert_eq!(second.rows.len(), 5);
    assert_eq!(calls.load(Ordering::SeqCst), 7);
    // The stale table for the same location is evicted
    assert_eq!(cache.len().expect("len"), 1);
}

#[test]
fn test_invalidate_forces_rebuild() {
    let calls = Arc::new(AtomicUsize::new(0));
    let scorer = counting_scorer(Arc::clone(&calls));
    let cache = DatasetCache::new();
    let source = MemoryReviewSource::new("fixture", reviews(2));

    cache.get_or_load(&source, &scorer).expect("load");
    let location = source.identity().expect("identity").location;
    assert_eq!(cache.invalidate(&location).expect("invalidate"), 1);
    assert!(cache.is_empty().expect("is_empty"));

    cache.get_or_load(&source, &scorer).expect("load");
    assert_eq!(calls.load(Ordering::SeqCst), 4);

    cache.clear().expect("clear");
    assert!(cache.is_empty().expect("is_empty"));
}

#[test]
fn test_concurrent_readers_share_one_build() {
    let calls = Arc::new(AtomicUsize::new(0));
    let scorer = Arc::new(counting_scorer(Arc::clone(&calls)));
    let cache = Arc::new(DatasetCache::new());
    let source = Arc::new(MemoryReviewSource::new("shared", reviews(4)));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let scorer = Arc::clone(&scorer);
            let source = Arc::clone(&source);
            thread::spawn(move || {
                cache
                    .get_or_load(&*source, &*scorer)
                    .expect("load")
                    .rows
                    .len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("thread panicked"), 4);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn test_rewritten_file_is_reloaded() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("reviews.csv");
    fs::write(&path, "reviews\nGood\n").expect("write");

    let calls = Arc::new(AtomicUsize::new(0));
    let scorer = counting_scorer(Arc::clone(&calls));
    let cache = DatasetCache::new();
    let source = CsvReviewSource::new(&path);

    let first = cache.get_or_load(&source, &scorer).expect("load");
    fs::write(&path, "reviews\nGood\nBad\nAverage\n").expect("write");
    let second = cache.get_or_load(&source, &scorer).expect("load");

    assert_eq!(first.rows.len(), 1);
    assert_eq!(second.rows.len(), 3);
    assert_eq!(second.report.total, 3);
}

#[test]
fn test_same_name_sources_with_different_content_are_distinct() {
    let scorer = counting_scorer(Arc::new(AtomicUsize::new(0)));
    let cache = DatasetCache::new();
    let alpha = MemoryReviewSource::new("shared-name", vec![Review::from_text("alpha")]);
    let beta = MemoryReviewSource::new("shared-name", vec![Review::from_text("beta")]);

    let first = cache.get_or_load(&alpha, &scorer).expect("load");
    let second = cache.get_or_load(&beta, &scorer).expect("load");

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.rows[0].review.text, "alpha");
    assert_eq!(second.rows[0].review.text, "beta");
    assert_eq!(cache.len().expect("len"), 1);
}

fn upbeat(_text: &str) -> Result<f64, ScoringError> {
    Ok(0.8)
}

fn gloomy(_text: &str) -> Result<f64, ScoringError> {
    Ok(-0.8)
}

#[test]
fn test_tables_are_cached_per_scorer() {
    let cache = DatasetCache::new();
    let source = MemoryReviewSource::new("fixture", reviews(2));
    let first = cache.get_or_load(&source, &upbeat).expect("load");
    let second = cache.get_or_load(&source, &gloomy).expect("load");
    let again = cache.get_or_load(&source, &upbeat).expect("load");

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &again));
    assert_ne!(first.scorer_id, second.scorer_id);
    assert!(first.rows.iter().all(|row| row.compound > 0.0));
    assert!(second.rows.iter().all(|row| row.compound < 0.0));
    assert_eq!(cache.len().expect("len"), 2);
}

#[test]
fn test_scorer_settings_are_part_of_the_key() {
    let cache = DatasetCache::new();
    let source = MemoryReviewSource::new("fixture", vec![Review::from_text("Great flight")]);

    let full = cache.get_or_load(&source, &VaderScorer::new()).expect("load");
    let capped = cache
        .get_or_load(&source, &VaderScorer::with_max_text_length(5))
        .expect("load");

    assert!(full.rows[0].compound > 0.05);
    // Over-long text fails to score and is recorded as neutral
    assert_eq!(capped.rows[0].compound, 0.0);
    assert_eq!(capped.report.failed, 1);
}
