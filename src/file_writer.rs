//! File writing utilities for filtered review exports.
//!
//! A filtered view can be written as CSV (one line per review, the columns
//! of the dashboard's review explorer), as JSON (the aggregated report plus
//! the rows), or as a plain text report.

use crate::error::Result;
use crate::filter::{FilterReport, FilteredView};
use crate::models::{EnrichedReview, OutputFormat};
use csv::Writer;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// One exported row
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    verification: &'static str,
    sentiment: &'static str,
    compound: f64,
    word_count: usize,
    review: &'a str,
}

impl<'a> From<&'a EnrichedReview> for ExportRow<'a> {
    fn from(row: &'a EnrichedReview) -> Self {
        Self {
            verification: row.verification().label(),
            sentiment: row.sentiment.label(),
            compound: row.compound,
            word_count: row.word_count,
            review: &row.clean_text,
        }
    }
}

#[derive(Serialize)]
struct JsonExport<'a> {
    report: FilterReport,
    reviews: Vec<ExportRow<'a>>,
}

/// Write `view` to `output_dir/<stem>.<ext>`.
///
/// Rows are ordered by compound score, highest first, as in the review
/// explorer. Returns the path of the created file.
pub fn write_view(
    view: &FilteredView<'_>,
    format: OutputFormat,
    output_dir: &Path,
    stem: &str,
) -> Result<PathBuf> {
    create_dir_all(output_dir)?;
    let file_path = output_dir.join(format!("{stem}.{}", format.extension()));

    match format {
        OutputFormat::Csv => write_csv_file(view, &file_path)?,
        OutputFormat::Json => write_json_file(view, &file_path)?,
        OutputFormat::Txt => write_txt_file(&view.report(), &file_path)?,
    }

    info!(
        path = %file_path.display(),
        rows = view.len(),
        "Exported filtered reviews"
    );
    Ok(file_path)
}

/// Write the filtered rows as CSV
pub fn write_csv_file(view: &FilteredView<'_>, file_path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(file_path)?;
    for row in view.ranked_by_compound() {
        writer.serialize(ExportRow::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the report and the filtered rows as pretty-printed JSON
pub fn write_json_file(view: &FilteredView<'_>, file_path: &Path) -> Result<()> {
    let export = JsonExport {
        report: view.report(),
        reviews: view
            .ranked_by_compound()
            .into_iter()
            .map(ExportRow::from)
            .collect(),
    };
    let writer = BufWriter::new(File::create(file_path)?);
    serde_json::to_writer_pretty(writer, &export)?;
    Ok(())
}

/// Write the plain text report
pub fn write_txt_file(report: &FilterReport, file_path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(file_path)?);
    writer.write_all(render_report(report).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Render a report as human-readable text
#[must_use]
pub fn render_report(report: &FilterReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    if summary.count == 0 {
        out.push_str("No reviews match the current filter selection.\n");
    }

    let _ = writeln!(out, "Reviews displayed:   {}", summary.count);
    let _ = writeln!(out, "Avg. sentiment:      {:.2}", summary.mean_compound);
    let _ = writeln!(out, "Positive share:      {:.0}%", summary.positive_share * 100.0);

    out.push_str("\nSentiment distribution\n");
    for (category, count) in report.distribution.iter() {
        let _ = writeln!(out, "  {:<14}{count}", category.label());
    }

    out.push_str("\nSentiment by verification status\n");
    for cell in report.breakdown.iter() {
        let _ = writeln!(
            out,
            "  {:<14}{:<10}{}",
            cell.verification.label(),
            cell.sentiment.label(),
            cell.count
        );
    }

    for (title, sample) in [("Longest", &report.longest), ("Shortest", &report.shortest)] {
        match sample {
            Some(sample) => {
                let _ = writeln!(out, "\n{title} review ({} words)", sample.word_count);
                let _ = writeln!(out, "  {}", sample.text);
            }
            None => {
                let _ = writeln!(out, "\n{title} review: none");
            }
        }
    }

    out
}
