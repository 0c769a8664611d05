//! Review sources: where raw review rows come from.
//!
//! A [`ReviewSource`] yields raw rows plus an identity used as the cache key,
//! so a changed file is reloaded while an unchanged one is enriched once.

use csv::{ByteRecord, ReaderBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

use crate::config::DataConfig;
use crate::error::{InsightsError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{Review, Verification};
use crate::validation::InputValidator;

/// Identity of a dataset version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    /// Canonical location of the dataset
    pub location: PathBuf,
    /// Size in bytes (or rows, for in-memory sources)
    pub len: u64,
    /// Last modification time, when the source has one
    pub modified: Option<SystemTime>,
    /// Content hash for sources without a modification time
    pub revision: u64,
}

/// Anything that can produce an ordered batch of raw reviews
pub trait ReviewSource: Send + Sync {
    /// Identity of the current contents; changes whenever the contents do
    fn identity(&self) -> Result<SourceKey>;

    /// Read every review, in source order
    fn load(&self) -> Result<Vec<Review>>;
}

/// Reviews read from a delimited file
#[derive(Debug, Clone)]
pub struct CsvReviewSource {
    path: PathBuf,
    text_column: String,
    verification_column: Option<String>,
}

impl CsvReviewSource {
    /// Read `path` using the default `reviews` / `verified` column names
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            text_column: "reviews".to_string(),
            verification_column: Some("verified".to_string()),
        }
    }

    /// Override the column names
    #[must_use]
    pub fn with_columns(
        mut self,
        text_column: impl Into<String>,
        verification_column: Option<String>,
    ) -> Self {
        self.text_column = text_column.into();
        self.verification_column = verification_column;
        self
    }

    /// Build a source from configuration, falling back to the secondary
    /// dataset when the primary one is missing
    pub fn from_config(config: &DataConfig) -> Result<Self> {
        let path = resolve_dataset(
            Path::new(&config.data_dir),
            &config.primary_file,
            &config.fallback_file,
        )?;
        Ok(Self::new(path).with_columns(
            config.text_column.clone(),
            config.verification_column.clone(),
        ))
    }

    /// Path this source reads from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReviewSource for CsvReviewSource {
    fn identity(&self) -> Result<SourceKey> {
        let metadata = std::fs::metadata(&self.path)?;
        let location = self
            .path
            .canonicalize()
            .unwrap_or_else(|_| self.path.clone());
        Ok(SourceKey {
            location,
            len: metadata.len(),
            modified: metadata.modified().ok(),
            revision: 0,
        })
    }

    fn load(&self) -> Result<Vec<Review>> {
        info!("Reading reviews from {}", self.path.display());
        let file = File::open(&self.path)?;
        read_reviews(file, &self.text_column, self.verification_column.as_deref())
    }
}

/// Reviews held in memory, for tests and embedding.
///
/// The identity includes a hash of the contents, so two sources under the
/// same name only share a cached table when they hold the same reviews.
#[derive(Debug, Clone, Default)]
pub struct MemoryReviewSource {
    name: String,
    reviews: Vec<Review>,
}

impl MemoryReviewSource {
    /// Wrap `reviews` under `name`
    pub fn new(name: impl Into<String>, reviews: Vec<Review>) -> Self {
        Self {
            name: name.into(),
            reviews,
        }
    }

    /// Replace the contents, producing a new identity
    pub fn replace(&mut self, reviews: Vec<Review>) {
        self.reviews = reviews;
    }

    fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.reviews.hash(&mut hasher);
        hasher.finish()
    }
}

impl ReviewSource for MemoryReviewSource {
    fn identity(&self) -> Result<SourceKey> {
        Ok(SourceKey {
            location: PathBuf::from(format!("memory:{}", self.name)),
            len: self.reviews.len() as u64,
            modified: None,
            revision: self.content_hash(),
        })
    }

    fn load(&self) -> Result<Vec<Review>> {
        Ok(self.reviews.clone())
    }
}

/// Pick `primary` inside `data_dir` if present, otherwise `fallback`
pub fn resolve_dataset(data_dir: &Path, primary: &str, fallback: &str) -> Result<PathBuf> {
    let primary_path = data_dir.join(primary);
    if primary_path.is_file() {
        return Ok(primary_path);
    }

    let fallback_path = data_dir.join(fallback);
    if fallback_path.is_file() {
        debug!(
            "Primary dataset {} missing, using {}",
            primary_path.display(),
            fallback_path.display()
        );
        return Ok(fallback_path);
    }

    Err(InsightsError::DatasetNotFound(format!(
        "neither {} nor {} exists",
        primary_path.display(),
        fallback_path.display()
    )))
}

/// Header of a leading pandas-style index column
fn is_index_header(header: &str) -> bool {
    header.is_empty() || header == "index" || header.starts_with("Unnamed:")
}

/// Parse reviews from delimited text.
///
/// `text_column` must be present in the header. `verification_column`, when
/// present in the header, decides verification status; otherwise the marker
/// embedded in the text does. Short or unparsable rows become reviews with
/// empty text instead of aborting the read.
pub fn read_reviews<R: Read>(
    reader: R,
    text_column: &str,
    verification_column: Option<&str>,
) -> Result<Vec<Review>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| InputValidator::sanitize_text(&String::from_utf8_lossy(h)))
        .collect();

    let text_idx = headers
        .iter()
        .position(|h| h == text_column)
        .ok_or_else(|| InsightsError::MissingColumn(text_column.to_string()))?;
    let verification_idx =
        verification_column.and_then(|column| headers.iter().position(|h| h == column));
    if verification_column.is_some() && verification_idx.is_none() {
        debug!("No verification column, deriving status from review text");
    }

    let passthrough: Vec<(usize, &String)> = headers
        .iter()
        .enumerate()
        .filter(|&(i, h)| {
            i != text_idx && Some(i) != verification_idx && !(i == 0 && is_index_header(h))
        })
        .collect();

    let mut reviews = Vec::new();
    let mut malformed = 0;
    let mut record = ByteRecord::new();

    loop {
        let line = reviews.len() + 2;
        match rdr.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                let field = |i: usize| {
                    record
                        .get(i)
                        .map(|raw| InputValidator::sanitize_text(&String::from_utf8_lossy(raw)))
                };

                let text = field(text_idx).unwrap_or_else(|| {
                    warn!(line, "Row has no review text, substituting empty text");
                    malformed += 1;
                    String::new()
                });

                let verified = match verification_idx {
                    Some(i) => Verification::classify_field(field(i).as_deref()),
                    None => Verification::classify_marker(&text),
                };

                let extra: BTreeMap<String, String> = passthrough
                    .iter()
                    .map(|&(i, name)| (name.clone(), field(i).unwrap_or_default()))
                    .collect();

                reviews.push(Review {
                    text,
                    verified,
                    extra,
                });
            }
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                warn!(line, error = %e, "Malformed row, substituting empty review");
                malformed += 1;
                reviews.push(Review::default());
            }
        }
    }

    MetricsCollector::default().record_load(reviews.len(), malformed);
    info!(rows = reviews.len(), malformed, "Loaded reviews");

    Ok(reviews)
}
