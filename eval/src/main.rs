// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Report export CLI for code smell classifiers
//!
//! Usage:
//!   smell-report --models bo_models.json --optimize-times bo_ct.json --report /mlcq/bo_0.csv
//!   smell-report --models baseline.json --baseline --report /qc/baseline.csv

use anyhow::{bail, Result};
use clap::Parser;
use smell_eval::config::ReportConfig;
use smell_eval::metrics::{load_models_dict, load_optimize_times};
use smell_eval::report::{self, DEFAULT_BASELINE_REPORT_NAME, DEFAULT_REPORT_NAME};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "smell-report")]
#[command(about = "Export evaluation reports of code smell classifiers")]
#[command(version)]
struct Args {
    /// JSON file mapping smell name to its model results
    #[arg(short, long)]
    models: PathBuf,

    /// JSON file mapping smell name to per-model optimization times
    #[arg(short = 't', long)]
    optimize_times: Option<PathBuf>,

    /// Report name relative to the reports directory, e.g. /mlcq/bo_0.csv
    #[arg(short, long)]
    report: Option<String>,

    /// Export a baseline report (no optimization columns, cross layout)
    #[arg(short, long)]
    baseline: bool,

    /// Base directory for reports (overrides the config file)
    #[arg(long)]
    reports_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a markdown summary of the exported table
    #[arg(long)]
    markdown: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = ReportConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.reports_dir {
        config = config.with_reports_dir(dir);
    }

    let models = load_models_dict(&args.models)?;
    tracing::info!("Loaded {} smell(s) from {}", models.len(), args.models.display());

    let exported = if args.baseline {
        if args.optimize_times.is_some() {
            tracing::warn!("Optimization times are ignored for baseline reports");
        }
        let name = args.report.as_deref().unwrap_or(DEFAULT_BASELINE_REPORT_NAME);
        report::export_report(&config, &models, name)
    } else {
        let optimize_times = args
            .optimize_times
            .as_deref()
            .map(load_optimize_times)
            .transpose()?;
        let name = args.report.as_deref().unwrap_or(DEFAULT_REPORT_NAME);
        report::create_report(&config, &models, optimize_times.as_ref(), name)
    };

    let Some((path, table)) = exported else {
        bail!("Report could not be exported");
    };

    if args.markdown {
        let title = if args.baseline { "Baseline Report" } else { "Optimization Report" };
        println!("\n{}", table.to_markdown(title));
    }

    println!("Report saved to: {} ({} rows)", path.display(), table.len());

    Ok(())
}
