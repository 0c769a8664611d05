use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use review_insights::config::AppConfig;
use review_insights::file_writer::{render_report, write_view};
use review_insights::filter::{apply_filter, FilterCriteria};
use review_insights::logging::{init_logging, OperationTimer};
use review_insights::metrics::MetricsCollector;
use review_insights::models::OutputFormat;
use review_insights::repository::{CsvReviewSource, ReviewSource};
use review_insights::sentiment::VaderScorer;
use review_insights::validation::InputValidator;
use review_insights::{DatasetCache, InsightsService};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the review dataset (defaults to the configured data directory)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Verification status to include (repeatable): "Trip Verified", "Not Verified"
    #[arg(long = "verification")]
    verification: Vec<String>,

    /// Sentiment category to include (repeatable): Positive, Neutral, Negative
    #[arg(long = "sentiment")]
    sentiment: Vec<String>,

    /// Minimum word count (inclusive)
    #[arg(long)]
    min_words: Option<usize>,

    /// Maximum word count (inclusive)
    #[arg(long)]
    max_words: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show key metrics, sentiment distribution and verification breakdown
    Summary {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List matching reviews, highest compound score first
    Explore {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of reviews to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Write matching reviews to a file
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output format (txt, csv or json)
        #[arg(short, long)]
        format: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output_dir: Option<String>,
    },
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    let _log_guard = init_logging(&config.logging, Some(&config.get_log_level()))?;
    if let Err(e) = MetricsCollector::init() {
        warn!("{e}");
    }

    info!("Starting review-insights");

    let service = build_service(&config, cli.input.as_ref())?;

    match &cli.command {
        Commands::Summary { filters, json } => summarize(&service, filters, *json)?,
        Commands::Explore { filters, limit } => explore(&service, filters, *limit)?,
        Commands::Export {
            filters,
            format,
            output_dir,
        } => export(&config, &service, filters, format.as_deref(), output_dir.as_deref())?,
    }

    Ok(())
}

/// Build the service over the dataset given on the command line or in configuration
fn build_service(config: &AppConfig, input: Option<&PathBuf>) -> Result<InsightsService> {
    let Some(path) = input else {
        return InsightsService::from_config(config).context("Failed to locate review dataset");
    };

    InputValidator::validate_dataset_path(path)?;
    let source = CsvReviewSource::new(path).with_columns(
        config.data.text_column.clone(),
        config.data.verification_column.clone(),
    );
    info!("Using review dataset at: {}", source.path().display());

    let source: Box<dyn ReviewSource> = Box::new(source);
    let scorer = VaderScorer::with_max_text_length(config.analysis.max_text_length);
    Ok(
        InsightsService::new(source, Arc::new(scorer), DatasetCache::global())
            .with_default_min_words(config.analysis.default_min_words),
    )
}

/// Turn command line filters into criteria, starting from the dashboard defaults
fn resolve_criteria(service: &InsightsService, filters: &FilterArgs) -> Result<FilterCriteria> {
    let defaults = service.default_criteria()?;

    let mut criteria = FilterCriteria::from_labels(
        &filters.verification,
        &filters.sentiment,
        filters
            .min_words
            .unwrap_or_else(|| defaults.word_count_range.min()),
        filters
            .max_words
            .unwrap_or_else(|| defaults.word_count_range.max()),
    )?;

    if filters.verification.is_empty() {
        criteria.verification = defaults.verification;
    }
    if filters.sentiment.is_empty() {
        criteria.sentiment = defaults.sentiment;
    }

    Ok(criteria)
}

#[allow(clippy::print_stdout)]
fn summarize(service: &InsightsService, filters: &FilterArgs, json: bool) -> Result<()> {
    let timer = OperationTimer::new("summary");
    let criteria = resolve_criteria(service, filters)?;
    let report = service.query(&criteria)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    timer.finish();
    Ok(())
}

#[allow(clippy::print_stdout)]
fn explore(service: &InsightsService, filters: &FilterArgs, limit: usize) -> Result<()> {
    let criteria = resolve_criteria(service, filters)?;
    let table = service.table()?;
    let view = apply_filter(&table.rows, &criteria)?;

    if view.is_empty() {
        warn!("No reviews match the current filter selection.");
        return Ok(());
    }

    println!(
        "{:<14}{:<10}{:>9}{:>7}  Review",
        "Verification", "Sentiment", "Compound", "Words"
    );
    for row in view.ranked_by_compound().into_iter().take(limit) {
        let preview: String = row.clean_text.chars().take(80).collect();
        println!(
            "{:<14}{:<10}{:>9.3}{:>7}  {preview}",
            row.verification().label(),
            row.sentiment.label(),
            row.compound,
            row.word_count
        );
    }

    Ok(())
}

fn export(
    config: &AppConfig,
    service: &InsightsService,
    filters: &FilterArgs,
    format: Option<&str>,
    output_dir: Option<&str>,
) -> Result<()> {
    let format_name = format.unwrap_or(&config.export.default_format);
    let output_format = format_name.parse::<OutputFormat>().unwrap_or_else(|_| {
        warn!("Invalid format: {}. Using txt as default.", format_name);
        OutputFormat::Txt
    });

    let output_dir = PathBuf::from(output_dir.unwrap_or(&config.export.output_directory));
    InputValidator::validate_output_path(&output_dir)?;

    let criteria = resolve_criteria(service, filters)?;
    let table = service.table()?;
    let view = apply_filter(&table.rows, &criteria)?;

    let stem = format!("reviews_{}", chrono::Local::now().format("%Y-%m-%d_%H-%M-%S"));
    let path = write_view(&view, output_format, &output_dir, &stem)?;
    info!("Exported {} reviews to {}", view.len(), path.display());

    Ok(())
}
