// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Report tables built from per-smell model results
//!
//! Two builders exist:
//! - [`create_report`]: slot-major over the `[DT, RF]` pair, with
//!   optimization and total time columns, under the `transfer` layout
//! - [`export_report`]: every model of every smell in dictionary order,
//!   metrics only, under the `cross` layout
//!
//! Both log failures and return `None` rather than raising; the `try_`
//! variants return the underlying error.

use crate::config::ReportConfig;
use crate::metrics::{ModelResult, ModelsDict, OptimizeTimes};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Metric columns shared by both report variants
pub const METRIC_COLUMNS: [&str; 11] = [
    "Accuracy",
    "Precision",
    "Recall",
    "F1",
    "ROC",
    "Test_Accuracy",
    "Test_Precision",
    "Test_Recall",
    "Test_F1",
    "Test_ROC",
    "Training_time",
];

/// Extra columns of the optimized report
pub const TIME_COLUMNS: [&str; 2] = ["Optimize_time", "Total_time"];

/// Model slots per smell in the optimized report (DecisionTree, RandomForest)
pub const MODEL_SLOTS: usize = 2;

pub const DEFAULT_REPORT_NAME: &str = "/unnamed.csv";
pub const DEFAULT_BASELINE_REPORT_NAME: &str = "/baseline.csv";

/// Subdirectory convention created under the reports base directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLayout {
    /// `{root, qc, mlcq, transfer}`, used by optimized reports
    Transfer,
    /// `{root, qc, mlcq, cross}`, used by baseline exports
    Cross,
}

impl ReportLayout {
    pub fn subdirs(&self) -> [&'static str; 4] {
        match self {
            ReportLayout::Transfer => ["", "qc", "mlcq", "transfer"],
            ReportLayout::Cross => ["", "qc", "mlcq", "cross"],
        }
    }
}

/// A table of floats indexed by model name
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub index: Vec<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl ReportTable {
    fn new(columns: &[&str]) -> Self {
        Self {
            index: Vec::new(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, label: &str, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.columns.len());
        self.index.push(label.to_string());
        self.rows.push(values);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of a named column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// First row labelled `model`
    pub fn row(&self, model: &str) -> Option<&[f64]> {
        let idx = self.index.iter().position(|m| m == model)?;
        Some(&self.rows[idx])
    }

    /// Write as CSV: an empty index header cell, then one line per model
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec![String::new()];
        header.extend(self.columns.iter().cloned());
        csv_writer.write_record(&header)?;

        for (label, values) in self.index.iter().zip(&self.rows) {
            let mut record = vec![label.clone()];
            record.extend(values.iter().map(|v| format_value(*v)));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Write the CSV to `path`; the parent directory must exist
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        self.write_csv(file)
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }

    /// Markdown summary for console output
    pub fn to_markdown(&self, title: &str) -> String {
        let mut report = String::new();

        report.push_str(&format!("# {}\n\n", title));
        report.push_str(&format!("**Generated:** {}\n\n", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")));
        report.push_str(&format!("**Models:** {}\n\n", self.len()));

        report.push_str("| Model |");
        for col in &self.columns {
            report.push_str(&format!(" {} |", col));
        }
        report.push_str("\n|-------|");
        for _ in &self.columns {
            report.push_str("------|");
        }
        report.push('\n');

        for (label, values) in self.index.iter().zip(&self.rows) {
            report.push_str(&format!("| {} |", label));
            for v in values {
                report.push_str(&format!(" {:.4} |", v));
            }
            report.push('\n');
        }

        report
    }
}

/// Integral floats keep one decimal ("1.0"), magnitudes from 1e16 use a signed
/// exponent ("1e+16"), NaN is written as an empty cell
fn format_value(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else if v.is_finite() && v.abs() >= 1e16 {
        let sci = format!("{:e}", v);
        match sci.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => sci,
        }
    } else if v.is_finite() && v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

fn metric_values(model: &ModelResult) -> Vec<f64> {
    vec![
        model.accuracy,
        model.precision,
        model.recall,
        model.f1,
        model.roc_auc,
        model.pred_accuracy,
        model.pred_precision,
        model.pred_recall,
        model.pred_f1,
        model.pred_roc,
        model.training_time,
    ]
}

/// Flatten the `[DT, RF]` pairs slot by slot, adding optimization and total time.
///
/// Without `optimize_times` every optimization time is zero.
pub fn build_optimized_table(
    models: &ModelsDict,
    optimize_times: Option<&OptimizeTimes>,
) -> Result<ReportTable> {
    let columns: Vec<&str> = METRIC_COLUMNS.iter().chain(TIME_COLUMNS.iter()).copied().collect();
    let mut table = ReportTable::new(&columns);
    // An empty dictionary counts as no dictionary
    let optimize_times = optimize_times.filter(|times| !times.is_empty());

    for slot in 0..MODEL_SLOTS {
        for (smell, pair) in models {
            let model = pair.get(slot).ok_or_else(|| {
                anyhow!("Smell '{}' has {} model(s), expected {}", smell, pair.len(), MODEL_SLOTS)
            })?;

            let optimize_time = match optimize_times {
                Some(times) => times
                    .get(smell)
                    .and_then(|t| t.get(slot))
                    .copied()
                    .ok_or_else(|| anyhow!("No optimization time for '{}' slot {}", smell, slot))?,
                None => 0.0,
            };

            let mut values = metric_values(model);
            values.push(optimize_time);
            values.push(model.training_time + optimize_time);
            table.push(&model.model_name, values);
        }
    }

    Ok(table)
}

/// Flatten every model of every smell, in dictionary order
pub fn build_baseline_table(models: &ModelsDict) -> ReportTable {
    let mut table = ReportTable::new(&METRIC_COLUMNS);
    for results in models.values() {
        for model in results {
            table.push(&model.model_name, metric_values(model));
        }
    }
    table
}

/// Create any missing layout directory under `base`
pub fn ensure_report_dirs(base: &Path, layout: ReportLayout) -> Result<()> {
    for sub in layout.subdirs() {
        let dir = base.join(sub);
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;
            tracing::debug!("Created report directory {}", dir.display());
        }
    }
    Ok(())
}

/// Resolve a report name such as "/mlcq/bo_0.csv" against the base directory
pub fn report_path(base: &Path, report_name: &str) -> PathBuf {
    base.join(report_name.trim_start_matches(&['/', '\\'][..]))
}

pub fn try_create_report(
    config: &ReportConfig,
    models: &ModelsDict,
    optimize_times: Option<&OptimizeTimes>,
    report_name: &str,
) -> Result<(PathBuf, ReportTable)> {
    let table = build_optimized_table(models, optimize_times)?;
    ensure_report_dirs(&config.reports_dir, ReportLayout::Transfer)?;
    let path = report_path(&config.reports_dir, report_name);
    table.save(&path)?;
    Ok((path, table))
}

/// Build and export the optimized report; failures are logged and yield `None`
pub fn create_report(
    config: &ReportConfig,
    models: &ModelsDict,
    optimize_times: Option<&OptimizeTimes>,
    report_name: &str,
) -> Option<(PathBuf, ReportTable)> {
    match try_create_report(config, models, optimize_times, report_name) {
        Ok((path, table)) => {
            tracing::info!("Report exported! at {}", path.display());
            Some((path, table))
        }
        Err(e) => {
            tracing::error!("Error while exporting the report {}: {:#}", report_name, e);
            None
        }
    }
}

pub fn try_export_report(
    config: &ReportConfig,
    models: &ModelsDict,
    report_name: &str,
) -> Result<(PathBuf, ReportTable)> {
    let table = build_baseline_table(models);
    ensure_report_dirs(&config.reports_dir, ReportLayout::Cross)?;
    let path = report_path(&config.reports_dir, report_name);
    table.save(&path)?;
    Ok((path, table))
}

/// Build and export the baseline report; failures are logged and yield `None`
pub fn export_report(
    config: &ReportConfig,
    models: &ModelsDict,
    report_name: &str,
) -> Option<(PathBuf, ReportTable)> {
    match try_export_report(config, models, report_name) {
        Ok((path, table)) => {
            tracing::info!("Report exported! at {}", path.display());
            Some((path, table))
        }
        Err(e) => {
            tracing::error!("Error while exporting the report {}: {:#}", report_name, e);
            None
        }
    }
}
