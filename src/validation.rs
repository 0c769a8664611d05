use anyhow::{anyhow, Result};
use std::path::Path;

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate the path of an input dataset
    pub fn validate_dataset_path(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.trim().is_empty() {
            return Err(anyhow!("Dataset path cannot be empty"));
        }

        if path_str.len() > 4096 {
            return Err(anyhow!("Dataset path too long (max 4096 characters)"));
        }

        if !path.exists() {
            return Err(anyhow!("Dataset does not exist: {path:?}"));
        }

        if !path.is_file() {
            return Err(anyhow!("Dataset path is not a file: {path:?}"));
        }

        Ok(())
    }

    /// Validate the path of an export target
    pub fn validate_output_path(path: &Path) -> Result<()> {
        if path.to_string_lossy().is_empty() {
            return Err(anyhow!("Output path cannot be empty"));
        }

        // Check for path traversal attempts
        let path_str = path.to_string_lossy();
        if path_str.contains("..") || path_str.contains('~') {
            return Err(anyhow!(
                "Output path contains potentially dangerous characters"
            ));
        }

        if path_str.len() > 4096 {
            return Err(anyhow!("Output path too long (max 4096 characters)"));
        }

        Ok(())
    }

    /// Validate a configured column name
    pub fn validate_column_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow!("Column name cannot be empty"));
        }

        if name.len() > 100 {
            return Err(anyhow!("Column name too long (max 100 characters)"));
        }

        if name.contains('\0') || name.contains('\r') || name.contains('\n') {
            return Err(anyhow!("Column name contains invalid characters"));
        }

        Ok(())
    }

    /// Validate the maximum text length handed to the scorer
    pub fn validate_max_text_length(max: usize) -> Result<()> {
        if max == 0 {
            return Err(anyhow!("max_text_length must be greater than 0"));
        }

        if max > 10_000_000 {
            return Err(anyhow!("max_text_length too large (max 10,000,000)"));
        }

        Ok(())
    }

    /// Sanitize text input
    ///
    /// Control characters other than newline, tab and carriage return are
    /// dropped and surrounding whitespace is trimmed.
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t' || *c == '\r')
            .collect::<String>()
            .trim()
            .to_string()
    }
}
