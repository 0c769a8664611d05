use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::filter::DEFAULT_MIN_WORDS;
use crate::sentiment::DEFAULT_MAX_TEXT_LENGTH;
use crate::validation::InputValidator;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
}

/// Where the review dataset lives and how its columns are named
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub data_dir: String,
    pub primary_file: String,
    pub fallback_file: String,
    pub text_column: String,
    pub verification_column: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub max_text_length: usize,
    pub default_min_words: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub default_format: String,
    pub output_directory: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                data_dir: "data".to_string(),
                primary_file: "BA_reviews_cleaned.csv".to_string(),
                fallback_file: "BA_reviews.csv".to_string(),
                text_column: "reviews".to_string(),
                verification_column: Some("verified".to_string()),
            },
            analysis: AnalysisConfig {
                max_text_length: DEFAULT_MAX_TEXT_LENGTH,
                default_min_words: DEFAULT_MIN_WORDS,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            export: ExportConfig {
                default_format: "txt".to_string(),
                output_directory: "./output".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .map_err(|e| anyhow::anyhow!("Failed to build default configuration: {}", e))?;

        let config = Config::builder()
            // Start with default values
            .add_source(defaults)
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("REVIEW_INSIGHTS").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate data config
        if self.data.data_dir.trim().is_empty() {
            return Err(anyhow::anyhow!("data_dir cannot be empty"));
        }
        if self.data.primary_file.trim().is_empty() {
            return Err(anyhow::anyhow!("primary_file cannot be empty"));
        }
        InputValidator::validate_column_name(&self.data.text_column)?;
        if let Some(column) = &self.data.verification_column {
            InputValidator::validate_column_name(column)?;
        }

        // Validate analysis config
        InputValidator::validate_max_text_length(self.analysis.max_text_length)?;

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        // Validate export config
        let valid_formats = ["txt", "csv", "json"];
        if !valid_formats.contains(&self.export.default_format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid export format: {}. Must be one of: {:?}",
                self.export.default_format,
                valid_formats
            ));
        }

        Ok(())
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}
