
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cli::compare::CompareSettings;
use crate::data_types::summary_metrics::{ConcordanceSummary, RateCounts};

/// This is a wrapper for writing out the summary stats to files
pub struct SummaryWriter {
    /// Comparison label to go on each row
    compare_label: String,
    /// The accumulated statistics for the run
    summary: ConcordanceSummary
}

/// Contains all the data written to each row of our stats file
#[derive(Serialize)]
struct SummaryRow {
    /// User provided label
    compare_label: String,
    /// The statistic on this row
    metric: String,
    /// Scope of the statistic, "local" or "genome_wide"
    scope: String,
    /// Numerator for the statistic
    matching: u64,
    /// Denominator for the statistic
    total: u64,
    /// The computed rate
    rate: f64
}

/// Top-level layout of the JSON summary
#[derive(Serialize)]
struct JsonSummary<'a> {
    /// Version of the tool that produced this summary
    version: String,
    /// When the summary was produced
    created: DateTime<Utc>,
    /// The settings the run used
    settings: &'a CompareSettings,
    /// Tallies and rates for each statistic
    metrics: Vec<SummaryRow>
}

impl SummaryWriter {
    /// Creates a new writer around the finished statistics
    /// # Arguments
    /// * `compare_label` - user provided comparison label
    /// * `summary` - the accumulated statistics
    pub fn new(compare_label: String, summary: ConcordanceSummary) -> Self {
        Self {
            compare_label,
            summary
        }
    }

    /// One row per (metric, scope) combination
    fn summary_rows(&self) -> Vec<SummaryRow> {
        let entries: [(&str, &str, RateCounts); 4] = [
            ("call_rate", "local", self.summary.call_rate),
            ("call_rate", "genome_wide", self.summary.genome_wide_call_rate),
            ("concordance", "local", self.summary.concordance),
            ("concordance", "genome_wide", self.summary.genome_wide_concordance)
        ];

        entries.into_iter()
            .map(|(metric, scope, counts)| SummaryRow {
                compare_label: self.compare_label.clone(),
                metric: metric.to_string(),
                scope: scope.to_string(),
                matching: counts.matching,
                total: counts.total,
                rate: counts.rate()
            })
            .collect()
    }

    /// Will write the summary out to the given file path
    /// # Arguments
    /// * `filename` - the filename for the output (tsv/csv)
    pub fn write_summary(&self, filename: &Path) -> csv::Result<()> {
        // modify the delimiter to "," if it ends with .csv
        let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
        let delimiter: u8 = if is_csv { b',' } else { b'\t' };
        let mut csv_writer: csv::Writer<File> = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(filename)?;

        for row in self.summary_rows() {
            csv_writer.serialize(&row)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Will write the JSON summary, which also carries the run metadata
    /// # Arguments
    /// * `settings` - the settings the run used
    /// * `filename` - the filename for the output (json)
    pub fn write_json(&self, settings: &CompareSettings, filename: &Path) -> anyhow::Result<()> {
        let report = JsonSummary {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created: Utc::now(),
            settings,
            metrics: self.summary_rows()
        };

        let mut writer = BufWriter::new(File::create(filename)?);
        serde_json::to_writer_pretty(&mut writer, &report)
            .with_context(|| format!("Error while serializing {filename:?}:"))?;
        writer.flush()
            .with_context(|| format!("Error while flushing output to {filename:?}:"))?;
        Ok(())
    }
}
