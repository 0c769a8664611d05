//! Unit tests for config.rs module

use review_insights::config::AppConfig;

#[test]
fn test_default_data_config() {
    let config = AppConfig::default();

    assert_eq!(config.data.data_dir, "data");
    assert_eq!(config.data.primary_file, "BA_reviews_cleaned.csv");
    assert_eq!(config.data.fallback_file, "BA_reviews.csv");
    assert_eq!(config.data.text_column, "reviews");
    assert_eq!(config.data.verification_column.as_deref(), Some("verified"));
}

#[test]
fn test_default_analysis_config() {
    let config = AppConfig::default();

    assert_eq!(config.analysis.max_text_length, 50_000);
    assert_eq!(config.analysis.default_min_words, 50);
}

#[test]
fn test_default_logging_config() {
    let config = AppConfig::default();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_default_export_config() {
    let config = AppConfig::default();

    assert_eq!(config.export.default_format, "txt");
    assert_eq!(config.export.output_directory, "./output");
}

#[test]
fn test_load_without_files_uses_defaults() {
    let config = AppConfig::load().expect("Failed to load configuration");
    assert_eq!(config.data.text_column, AppConfig::default().data.text_column);
}

#[test]
fn test_validate_rejects_bad_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_log_format() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_export_format() {
    let mut config = AppConfig::default();
    config.export.default_format = "pdf".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_empty_text_column() {
    let mut config = AppConfig::default();
    config.data.text_column = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_allows_missing_verification_column() {
    let mut config = AppConfig::default();
    config.data.verification_column = None;
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_huge_text_limit() {
    let mut config = AppConfig::default();
    config.analysis.max_text_length = 10_000_001;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_round_trips_through_json() {
    let config = AppConfig::default();
    let json = serde_json::to_string(&config).expect("serialize");
    let parsed: AppConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed.data.primary_file, config.data.primary_file);
    assert_eq!(parsed.analysis.default_min_words, config.analysis.default_min_words);
}
